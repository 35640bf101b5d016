use image::imageops::{self, FilterType};
use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DOWNSCALE_FACTOR, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{KanadeError, Result};
use crate::frame::Frame;

/// Per-frame preparation applied before differentiation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Frames shrink to `(floor(w / downscale), floor(h / downscale))`. 1.0 disables resizing.
    pub downscale: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            downscale: DEFAULT_DOWNSCALE_FACTOR,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.downscale.is_finite() || self.downscale < 1.0 {
            return Err(KanadeError::InvalidDownscale(self.downscale));
        }
        Ok(())
    }

    /// Output size for a `width` x `height` input.
    pub fn target_size(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        self.validate()?;
        let w = (width as f32 / self.downscale) as usize;
        let h = (height as f32 / self.downscale) as usize;
        if w == 0 || h == 0 {
            return Err(KanadeError::InvalidDownscale(self.downscale));
        }
        Ok((w, h))
    }
}

/// Shrink a frame by the configured factor using bilinear filtering.
pub fn preprocess_frame(frame: Frame, config: &PreprocessConfig) -> Result<Frame> {
    let (w, h) = config.target_size(frame.width(), frame.height())?;
    if w == frame.width() && h == frame.height() {
        return Ok(frame);
    }

    let metadata = frame.metadata.clone();
    let resized = imageops::resize(&to_gray_image(&frame), w as u32, h as u32, FilterType::Triangle);
    Ok(from_gray_image(resized)?.with_metadata(metadata))
}

/// BT.601 luma of one RGB sample, rounded to the nearest byte.
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

pub(crate) fn to_gray_image(frame: &Frame) -> GrayImage {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    GrayImage::from_fn(w, h, |x, y| image::Luma([frame.data[[y as usize, x as usize]]]))
}

pub(crate) fn from_gray_image(img: GrayImage) -> Result<Frame> {
    let (w, h) = img.dimensions();
    let data = Array2::from_shape_vec((h as usize, w as usize), img.into_raw()).map_err(|_| {
        KanadeError::InvalidDimensions {
            width: w,
            height: h,
        }
    })?;
    Ok(Frame::new(data))
}
