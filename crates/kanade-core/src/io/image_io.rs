use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};
use ndarray::Array2;

use crate::consts::IMAGE_SEQUENCE_EXTENSIONS;
use crate::error::{KanadeError, Result};
use crate::frame::Frame;
use crate::preprocess::{from_gray_image, luminance_u8};

/// Convert a byte field into an 8-bit grayscale image.
pub fn field_to_image(field: &Array2<u8>) -> GrayImage {
    let (h, w) = field.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        image::Luma([field[[y as usize, x as usize]]])
    })
}

/// Save a byte field (or frame data) as 8-bit grayscale PNG.
pub fn save_png(field: &Array2<u8>, path: &Path) -> Result<()> {
    let (h, w) = field.dim();
    if h == 0 || w == 0 {
        return Err(KanadeError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        });
    }
    field_to_image(field).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load any supported image file as an 8-bit luma frame.
///
/// Color images are reduced with the same BT.601 weights as RGB SER video.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    if !img.color().has_color() {
        return from_gray_image(img.to_luma8());
    }
    let rgb = img.to_rgb8();
    let luma = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        image::Luma([luminance_u8(r, g, b)])
    });
    from_gray_image(luma)
}

/// True if `path` has an extension readable as part of an image sequence.
pub fn is_sequence_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| IMAGE_SEQUENCE_EXTENSIONS.contains(&e.as_str()))
}

/// List the image files of a directory, sorted by file name.
pub fn list_image_sequence(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_sequence_image(p))
        .collect();
    paths.sort();
    Ok(paths)
}
