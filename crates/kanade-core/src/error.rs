use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanadeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    #[error("Degenerate window {width}x{height}: both sides must be at least 2")]
    DegenerateWindow { width: usize, height: usize },

    #[error("Invalid grid shift {0}: must be at least 1")]
    InvalidShift(usize),

    #[error("Invalid device frame size {width}x{height}")]
    InvalidDeviceSize { width: usize, height: usize },

    #[error("Invalid downscale factor {0}")]
    InvalidDownscale(f32),

    #[error(
        "Window {window_width}x{window_height} does not fit in frame {frame_width}x{frame_height}"
    )]
    WindowExceedsFrame {
        window_width: usize,
        window_height: usize,
        frame_width: usize,
        frame_height: usize,
    },

    #[error(
        "Window {window_width}x{window_height} at ({x}, {y}) is out of bounds for frame {frame_width}x{frame_height}"
    )]
    OutOfBounds {
        x: usize,
        y: usize,
        window_width: usize,
        window_height: usize,
        frame_width: usize,
        frame_height: usize,
    },

    #[error("Frame size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    FrameSizeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Field shape mismatch: expected {expected_cols}x{expected_rows}, got {cols}x{rows}")]
    FieldShapeMismatch {
        expected_cols: usize,
        expected_rows: usize,
        cols: usize,
        rows: usize,
    },
}

impl KanadeError {
    /// True for errors raised while validating configuration, before any frame is read.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DegenerateWindow { .. }
                | Self::InvalidShift(_)
                | Self::InvalidDownscale(_)
                | Self::InvalidDeviceSize { .. }
                | Self::WindowExceedsFrame { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, KanadeError>;
