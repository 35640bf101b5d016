#[allow(dead_code)]
mod common;

use std::io::Write;

use ndarray::Array2;
use tempfile::NamedTempFile;

use kanade_core::error::KanadeError;
use kanade_core::frame::ColorMode;
use kanade_core::io::ser::SerReader;
use kanade_core::io::ser_writer::SerWriter;

use common::{build_ser_header_full, build_ser_with_frames, write_test_ser};

#[test]
fn test_parse_8bit_mono() {
    let frame_data: Vec<u8> = (0u8..12).collect();
    let file = write_test_ser(&build_ser_with_frames(4, 3, &[frame_data]));

    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.pixel_depth, 8);
    assert_eq!(reader.header.color_mode(), ColorMode::Mono);
    assert_eq!(reader.header.observer, "Test");
    assert_eq!(reader.header.telescope, "MyScope");

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 3);
    assert_eq!(frame.data[[0, 0]], 0);
    assert_eq!(frame.data[[1, 0]], 4);
    assert_eq!(frame.data[[2, 3]], 11);
    assert_eq!(frame.metadata.frame_index, 0);
    assert_eq!(frame.metadata.timestamp_us, None);
}

#[test]
fn test_16bit_samples_shift_to_8bit() {
    let mut buf = build_ser_header_full(2, 1, 16, 1, 0);
    buf.extend_from_slice(&0xABCDu16.to_le_bytes());
    buf.extend_from_slice(&0x00FFu16.to_le_bytes());
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0]], 0xAB);
    assert_eq!(frame.data[[0, 1]], 0x00);
}

#[test]
fn test_12bit_samples_shift_to_8bit() {
    let mut buf = build_ser_header_full(1, 1, 12, 1, 0);
    buf.extend_from_slice(&4095u16.to_le_bytes());
    let file = write_test_ser(&buf);

    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0]], 255);
}

#[test]
fn test_rgb_and_bgr_convert_to_luma() {
    let pixels = [255u8, 0, 0, 0, 255, 0, 0, 0, 255];

    let mut rgb = build_ser_header_full(3, 1, 8, 1, 100);
    rgb.extend_from_slice(&pixels);
    let file = write_test_ser(&rgb);
    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data.as_slice().unwrap(), &[76, 150, 29]);

    let mut bgr = build_ser_header_full(3, 1, 8, 1, 101);
    bgr.extend_from_slice(&pixels);
    let file = write_test_ser(&bgr);
    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data.as_slice().unwrap(), &[29, 150, 76]);
}

#[test]
fn test_timestamps_from_trailer() {
    let mut buf = build_ser_with_frames(2, 2, &[vec![0; 4], vec![1; 4]]);
    buf.extend_from_slice(&1_000u64.to_le_bytes());
    buf.extend_from_slice(&2_000u64.to_le_bytes());
    let file = write_test_ser(&buf);

    let reader = SerReader::open(file.path()).unwrap();
    let frames: Vec<_> = reader.frames().collect::<Result<_, _>>().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].metadata.timestamp_us, Some(1_000));
    assert_eq!(frames[1].metadata.timestamp_us, Some(2_000));
    assert_eq!(frames[1].metadata.frame_index, 1);
}

#[test]
fn test_frame_index_out_of_range() {
    let file = write_test_ser(&build_ser_with_frames(2, 2, &[vec![0; 4]]));
    let reader = SerReader::open(file.path()).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(KanadeError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_truncated_file_rejected() {
    let mut buf = build_ser_with_frames(4, 4, &[vec![0; 16], vec![0; 16]]);
    buf.truncate(buf.len() - 5);
    let file = write_test_ser(&buf);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(KanadeError::InvalidSer(_))
    ));
}

#[test]
fn test_bad_magic_rejected() {
    let mut buf = build_ser_with_frames(2, 2, &[vec![0; 4]]);
    buf[0] = b'X';
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&buf).unwrap();
    assert!(matches!(
        SerReader::open(file.path()),
        Err(KanadeError::InvalidSer(_))
    ));
}

// ---------------------------------------------------------------------------
// SerWriter
// ---------------------------------------------------------------------------

#[test]
fn test_writer_patches_frame_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("field.ser");

    let mut writer = SerWriter::create(&path, 3, 2).unwrap();
    let a = Array2::from_shape_fn((2, 3), |(r, c)| (r * 3 + c) as u8);
    let b = Array2::from_elem((2, 3), 200u8);
    writer.write_frame(&a).unwrap();
    writer.write_frame(&b).unwrap();
    assert_eq!(writer.frames_written(), 2);
    writer.finalize().unwrap();

    let reader = SerReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 2);
    assert_eq!(reader.header.width, 3);
    assert_eq!(reader.header.height, 2);
    assert_eq!(reader.read_frame(0).unwrap().data, a);
    assert_eq!(reader.read_frame(1).unwrap().data, b);
}

#[test]
fn test_writer_rejects_wrong_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = SerWriter::create(&dir.path().join("x.ser"), 3, 2).unwrap();
    let err = writer.write_frame(&Array2::zeros((3, 3))).unwrap_err();
    assert!(matches!(err, KanadeError::FrameSizeMismatch { .. }));
}

#[test]
fn test_writer_handles_non_contiguous_views() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.ser");
    let source = Array2::from_shape_fn((3, 2), |(r, c)| (r * 2 + c) as u8);
    let transposed = source.t().to_owned();
    let mut writer = SerWriter::create(&path, 3, 2).unwrap();
    writer.write_frame(&transposed).unwrap();
    writer.finalize().unwrap();

    let frame = SerReader::open(&path).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data, transposed);
}
