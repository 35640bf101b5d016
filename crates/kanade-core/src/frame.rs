use ndarray::Array2;

use crate::error::{KanadeError, Result};

/// A single 8-bit grayscale image frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<u8>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    /// Build a frame from a row-major byte buffer.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(KanadeError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        let data = Array2::from_shape_vec((height, width), pixels).map_err(|_| {
            KanadeError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            }
        })?;
        Ok(Self::new(data))
    }

    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// The previous/current frame double buffer consumed by one gradient cycle.
///
/// Both frames always share the same dimensions. Advancing moves the current
/// frame into the previous slot, so no pixel data is copied between cycles.
#[derive(Debug)]
pub struct FramePair {
    previous: Frame,
    current: Frame,
}

impl FramePair {
    pub fn new(previous: Frame, current: Frame) -> Result<Self> {
        check_same_size(&previous, &current)?;
        Ok(Self { previous, current })
    }

    pub fn previous(&self) -> &Frame {
        &self.previous
    }

    pub fn current(&self) -> &Frame {
        &self.current
    }

    pub fn width(&self) -> usize {
        self.current.width()
    }

    pub fn height(&self) -> usize {
        self.current.height()
    }

    /// Shift the pair forward by one frame: `current` becomes `previous`.
    pub fn advance(self, next: Frame) -> Result<Self> {
        check_same_size(&self.current, &next)?;
        Ok(Self {
            previous: self.current,
            current: next,
        })
    }

    pub fn into_frames(self) -> (Frame, Frame) {
        (self.previous, self.current)
    }
}

fn check_same_size(expected: &Frame, actual: &Frame) -> Result<()> {
    if expected.data.dim() != actual.data.dim() {
        return Err(KanadeError::FrameSizeMismatch {
            expected_width: expected.width(),
            expected_height: expected.height(),
            width: actual.width(),
            height: actual.height(),
        });
    }
    Ok(())
}

/// Color/Bayer mode of the source data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about a frame source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    /// Human-readable origin (file path or device name).
    pub description: String,
    /// Frame count, when the source knows it up front.
    pub total_frames: Option<usize>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}

impl SourceInfo {
    /// Info for a plain 8-bit mono source with no capture metadata.
    pub fn mono8(description: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            description: description.into(),
            total_frames: None,
            width,
            height,
            bit_depth: 8,
            color_mode: ColorMode::Mono,
            observer: None,
            telescope: None,
            instrument: None,
        }
    }
}
