pub mod field;
pub mod normalize;
pub mod region;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_EXTENT};
use crate::error::{KanadeError, Result};

pub use field::{build_fields, build_fields_into, rescale_to_byte, GradientFields};
pub use normalize::{normalize_field, DegeneratePolicy, Normalization};
pub use region::{region_gradient, RegionGradient};

/// Size of the rectangular sampling block used for one gradient estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub width: usize,
    pub height: usize,
}

impl Window {
    /// Build a window, rejecting sides too short for a forward difference.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let window = Self { width, height };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_WINDOW_EXTENT || self.height < MIN_WINDOW_EXTENT {
            return Err(KanadeError::DegenerateWindow {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Number of samples covered by the window.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left pixel coordinate of a window placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub x: usize,
    pub y: usize,
}

impl Origin {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Number of window placements along one axis: `floor((frame - window) / shift) + 1`.
///
/// Returns 0 when the window does not fit or the shift is zero.
pub fn grid_extent(frame: usize, window: usize, shift: usize) -> usize {
    if shift == 0 || window > frame {
        return 0;
    }
    (frame - window) / shift + 1
}

/// Validated placement grid for one frame size, window and shift.
///
/// Determines the shape of every output field: `(rows, cols)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub window: Window,
    pub shift: usize,
    pub frame_width: usize,
    pub frame_height: usize,
    pub cols: usize,
    pub rows: usize,
}

impl GridGeometry {
    pub fn new(frame_width: usize, frame_height: usize, window: Window, shift: usize) -> Result<Self> {
        window.validate()?;
        if shift == 0 {
            return Err(KanadeError::InvalidShift(shift));
        }
        if window.width > frame_width || window.height > frame_height {
            return Err(KanadeError::WindowExceedsFrame {
                window_width: window.width,
                window_height: window.height,
                frame_width,
                frame_height,
            });
        }

        Ok(Self {
            window,
            shift,
            frame_width,
            frame_height,
            cols: grid_extent(frame_width, window.width, shift),
            rows: grid_extent(frame_height, window.height, shift),
        })
    }

    /// Output field shape as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Window origin for the cell at `(row, col)` of the output field.
    pub fn origin(&self, row: usize, col: usize) -> Origin {
        Origin::new(col * self.shift, row * self.shift)
    }

    /// All window origins in row-major field order.
    pub fn origins(&self) -> impl Iterator<Item = (usize, usize, Origin)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (row, col, self.origin(row, col))))
    }
}
