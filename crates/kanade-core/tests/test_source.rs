#[allow(dead_code)]
mod common;

use std::path::PathBuf;

use ndarray::Array2;

use kanade_core::error::KanadeError;
use kanade_core::io::image_io::save_png;
use kanade_core::source::{open_source, DeviceConfig, InputSpec};

use common::{build_ser_with_frames, write_test_ser};

fn device(width: usize, height: usize) -> DeviceConfig {
    DeviceConfig { width, height }
}

#[test]
fn test_missing_path_is_input_unavailable() {
    let spec = InputSpec::Path(PathBuf::from("/definitely/not/here.ser"));
    let err = open_source(&spec, &DeviceConfig::default()).err().unwrap();
    assert!(matches!(err, KanadeError::InputUnavailable(_)), "got: {err}");
}

#[test]
fn test_unsupported_extension_is_input_unavailable() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let spec = InputSpec::Path(file.path().to_path_buf());
    let err = open_source(&spec, &DeviceConfig::default()).err().unwrap();
    assert!(matches!(err, KanadeError::InputUnavailable(_)));
}

#[test]
fn test_corrupt_ser_is_input_unavailable() {
    let file = write_test_ser(b"not a ser file at all");
    let spec = InputSpec::Path(file.path().to_path_buf());
    let err = open_source(&spec, &DeviceConfig::default()).err().unwrap();
    assert!(matches!(err, KanadeError::InputUnavailable(ref msg) if msg.contains("SER")));
}

#[test]
fn test_ser_source_plays_all_frames() {
    let frames = vec![vec![10u8; 6], vec![20u8; 6], vec![30u8; 6]];
    let file = write_test_ser(&build_ser_with_frames(3, 2, &frames));
    let mut source = open_source(
        &InputSpec::Path(file.path().to_path_buf()),
        &DeviceConfig::default(),
    )
    .unwrap();

    assert_eq!(source.info().total_frames, Some(3));
    assert_eq!((source.info().width, source.info().height), (3, 2));
    assert_eq!(source.info().observer.as_deref(), Some("Test"));

    let mut seen = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        seen.push(frame.data[[1, 2]]);
    }
    assert_eq!(seen, vec![10, 20, 30]);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn test_image_directory_is_read_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    save_png(&Array2::from_elem((4, 5), 200u8), &dir.path().join("frame_02.png")).unwrap();
    save_png(&Array2::from_elem((4, 5), 100u8), &dir.path().join("frame_01.png")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut source = open_source(
        &InputSpec::Path(dir.path().to_path_buf()),
        &DeviceConfig::default(),
    )
    .unwrap();
    assert_eq!(source.info().total_frames, Some(2));
    assert_eq!((source.info().width, source.info().height), (5, 4));

    let first = source.next_frame().unwrap().unwrap();
    let second = source.next_frame().unwrap().unwrap();
    assert_eq!(first.data[[0, 0]], 100);
    assert_eq!(second.data[[0, 0]], 200);
    assert_eq!(second.metadata.frame_index, 1);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn test_empty_directory_is_input_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_source(
        &InputSpec::Path(dir.path().to_path_buf()),
        &DeviceConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, KanadeError::InputUnavailable(_)));
}

#[test]
fn test_raw_stream_file_uses_device_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.gray");
    let bytes: Vec<u8> = (0u8..24).collect();
    std::fs::write(&path, &bytes).unwrap();

    let mut source = open_source(&InputSpec::Path(path), &device(4, 3)).unwrap();
    assert_eq!(source.info().total_frames, Some(2));

    let first = source.next_frame().unwrap().unwrap();
    assert_eq!(first.data.dim(), (3, 4));
    assert_eq!(first.data[[2, 3]], 11);
    let second = source.next_frame().unwrap().unwrap();
    assert_eq!(second.data[[0, 0]], 12);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn test_raw_stream_with_overflowing_geometry_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.raw");
    std::fs::write(&path, [0u8; 16]).unwrap();

    let err = open_source(&InputSpec::Path(path), &device(usize::MAX, 2))
        .err()
        .unwrap();
    assert!(matches!(err, KanadeError::InputUnavailable(ref msg) if msg.contains("device frame size")));
}

#[test]
fn test_input_spec_display() {
    assert_eq!(
        format!("{}", InputSpec::DefaultDevice),
        "default device (stdin)"
    );
    assert_eq!(
        format!("{}", InputSpec::Path(PathBuf::from("clip.ser"))),
        "clip.ser"
    );
}
