use ndarray::{s, Array2, ArrayView2};

use crate::error::{KanadeError, Result};
use crate::frame::FramePair;

use super::{Origin, Window};

/// Derivative estimates for one window placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionGradient {
    /// Mean horizontal derivative over the window and both frames.
    pub ix: f64,
    /// Mean vertical derivative over the window and both frames.
    pub iy: f64,
    /// Mean temporal derivative (current minus previous) over the window.
    pub it: f64,
}

/// Compute Ix, Iy and It for one window, checking that it lies inside the frames.
pub fn region_gradient(pair: &FramePair, window: Window, origin: Origin) -> Result<RegionGradient> {
    window.validate()?;
    let (frame_width, frame_height) = (pair.width(), pair.height());
    let fits_x = origin.x.checked_add(window.width).is_some_and(|end| end <= frame_width);
    let fits_y = origin.y.checked_add(window.height).is_some_and(|end| end <= frame_height);
    if !fits_x || !fits_y {
        return Err(KanadeError::OutOfBounds {
            x: origin.x,
            y: origin.y,
            window_width: window.width,
            window_height: window.height,
            frame_width,
            frame_height,
        });
    }

    Ok(estimate(
        &pair.previous().data,
        &pair.current().data,
        window,
        origin,
    ))
}

/// Unchecked estimate used by the field builder once the grid has been validated.
///
/// Panics if the window leaves either array.
pub(crate) fn estimate(
    previous: &Array2<u8>,
    current: &Array2<u8>,
    window: Window,
    origin: Origin,
) -> RegionGradient {
    let rows = origin.y..origin.y + window.height;
    let cols = origin.x..origin.x + window.width;
    let first = previous.slice(s![rows.clone(), cols.clone()]);
    let next = current.slice(s![rows, cols]);

    RegionGradient {
        ix: ix_region(&first, &next),
        iy: iy_region(&first, &next),
        it: it_region(&first, &next),
    }
}

/// Horizontal gradient: forward differences along each row of both frames,
/// divided by `2 * height * (width - 1)`.
///
/// Both views must share a shape whose sides are at least 2.
pub fn ix_region(first: &ArrayView2<u8>, next: &ArrayView2<u8>) -> f64 {
    let (h, w) = first.dim();
    let mut sum = 0i64;

    for row in 0..h {
        for col in 0..w - 1 {
            sum += first[[row, col + 1]] as i64 - first[[row, col]] as i64;
            sum += next[[row, col + 1]] as i64 - next[[row, col]] as i64;
        }
    }

    sum as f64 / (2 * h * (w - 1)) as f64
}

/// Vertical gradient: forward differences down each column of both frames,
/// divided by `2 * width * (height - 1)`.
pub fn iy_region(first: &ArrayView2<u8>, next: &ArrayView2<u8>) -> f64 {
    let (h, w) = first.dim();
    let mut sum = 0i64;

    for col in 0..w {
        for row in 0..h - 1 {
            sum += first[[row + 1, col]] as i64 - first[[row, col]] as i64;
            sum += next[[row + 1, col]] as i64 - next[[row, col]] as i64;
        }
    }

    sum as f64 / (2 * w * (h - 1)) as f64
}

/// Temporal gradient: per-sample `next - first`, averaged over the window.
pub fn it_region(first: &ArrayView2<u8>, next: &ArrayView2<u8>) -> f64 {
    let (h, w) = first.dim();
    let sum: i64 = first
        .iter()
        .zip(next.iter())
        .map(|(&a, &b)| b as i64 - a as i64)
        .sum();

    sum as f64 / (h * w) as f64
}
