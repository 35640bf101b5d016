use std::cell::Cell;
use std::collections::VecDeque;

use ndarray::Array2;

use kanade_core::error::Result;
use kanade_core::frame::{Frame, FramePair, SourceInfo};
use kanade_core::gradient::GradientFields;
use kanade_core::io::ser::{SER_HEADER_SIZE, SER_MAGIC};
use kanade_core::pipeline::sink::FieldSink;
use kanade_core::source::FrameSource;

/// 178-byte SER header for 8-bit mono frames. Frame bytes go after it.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// SER header with an explicit bit depth and color id
/// (0 mono, 8-11 Bayer, 100 RGB, 101 BGR).
///
/// Observer is "Test" and telescope "MyScope"; other text fields are blank.
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let text = |s: &str| {
        let mut field = [0u8; 40];
        field[..s.len()].copy_from_slice(s.as_bytes());
        field
    };

    let mut buf = SER_MAGIC.to_vec();
    // LuID, ColorID, LittleEndian flag, then the geometry fields
    for value in [
        0,
        color_id,
        0,
        width as i32,
        height as i32,
        bit_depth as i32,
        num_frames as i32,
    ] {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf.extend_from_slice(&text("Test"));
    buf.extend_from_slice(&text(""));
    buf.extend_from_slice(&text("MyScope"));
    // DateTime and DateTimeUTC
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write `data` to a `.ser` temp file that lives as long as the handle.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    std::fs::write(file.path(), data).expect("write SER data");
    file
}

pub fn flat_frame(h: usize, w: usize, value: u8) -> Frame {
    Frame::new(Array2::from_elem((h, w), value))
}

/// `base + slope * x` along every row.
pub fn horizontal_ramp(h: usize, w: usize, base: u8, slope: u8) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(_, col)| {
        base + slope * col as u8
    }))
}

/// `base + slope * y` down every column.
pub fn vertical_ramp(h: usize, w: usize, base: u8, slope: u8) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(row, _)| {
        base + slope * row as u8
    }))
}

/// Columns left of `edge_x` hold `left`, the rest hold `right`.
pub fn step_edge(h: usize, w: usize, edge_x: usize, left: u8, right: u8) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(_, col)| {
        if col < edge_x { left } else { right }
    }))
}

/// Deterministic textured frame with gradients in every direction.
pub fn textured_frame(h: usize, w: usize, phase: usize) -> Frame {
    Frame::new(Array2::from_shape_fn((h, w), |(row, col)| {
        ((col * 7 + row * 13 + phase * 5) % 256) as u8
    }))
}

pub fn pair(previous: Frame, current: Frame) -> FramePair {
    FramePair::new(previous, current).expect("frames share a size")
}

/// Frame source backed by an in-memory queue. Counts reads.
pub struct VecSource {
    frames: VecDeque<Frame>,
    info: SourceInfo,
    pub reads: Cell<usize>,
}

impl VecSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        let (w, h) = frames
            .first()
            .map(|f| (f.width() as u32, f.height() as u32))
            .unwrap_or((0, 0));
        let mut info = SourceInfo::mono8("memory", w, h);
        info.total_frames = Some(frames.len());
        Self {
            frames: frames.into(),
            info,
            reads: Cell::new(0),
        }
    }
}

impl FrameSource for VecSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.frames.pop_front())
    }
}

/// Sink that keeps a copy of every cycle's fields.
#[derive(Default)]
pub struct CollectingSink {
    pub cycles: Vec<(usize, GradientFields)>,
    pub finished: bool,
}

impl FieldSink for CollectingSink {
    fn present(&mut self, cycle: usize, _frame: &Frame, fields: &GradientFields) -> Result<()> {
        self.cycles.push((cycle, fields.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
