use std::path::Path;

use ndarray::Array2;

use kanade_core::error::KanadeError;
use kanade_core::io::image_io::{
    field_to_image, is_sequence_image, list_image_sequence, load_image, save_png,
};

#[test]
fn test_png_round_trip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("field.png");
    let field = Array2::from_shape_fn((7, 11), |(r, c)| (r * 31 + c * 3) as u8);

    save_png(&field, &path).unwrap();
    let frame = load_image(&path).unwrap();
    assert_eq!(frame.data, field);
}

#[test]
fn test_color_images_use_bt601_luma() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.png");
    let mut img = image::RgbImage::new(3, 1);
    img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
    img.put_pixel(2, 0, image::Rgb([0, 0, 255]));
    img.save(&path).unwrap();

    let frame = load_image(&path).unwrap();
    // Same weights as the RGB SER path: 0.299, 0.587, 0.114
    assert_eq!(frame.data.as_slice().unwrap(), &[76, 150, 29]);
}

#[test]
fn test_field_to_image_orientation() {
    let field = Array2::from_shape_fn((2, 3), |(r, c)| (r * 10 + c) as u8);
    let img = field_to_image(&field);
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [12]);
    assert_eq!(img.get_pixel(0, 1).0, [10]);
}

#[test]
fn test_empty_field_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_png(&Array2::zeros((0, 5)), &dir.path().join("e.png")).unwrap_err();
    assert!(matches!(err, KanadeError::InvalidDimensions { width: 5, height: 0 }));
}

#[test]
fn test_sequence_listing_filters_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    let field = Array2::from_elem((2, 2), 9u8);
    for name in ["b.png", "a.PNG", "c.tif"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    save_png(&field, &dir.path().join("b.png")).unwrap();
    std::fs::write(dir.path().join("readme.md"), "x").unwrap();
    std::fs::create_dir(dir.path().join("nested.png")).unwrap();

    let names: Vec<String> = list_image_sequence(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png", "c.tif"]);
}

#[test]
fn test_is_sequence_image() {
    assert!(is_sequence_image(Path::new("x/frame.png")));
    assert!(is_sequence_image(Path::new("frame.TIFF")));
    assert!(!is_sequence_image(Path::new("frame.ser")));
    assert!(!is_sequence_image(Path::new("frame")));
}
