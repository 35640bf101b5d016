use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{DISPLAY_MAX, PARALLEL_CELL_THRESHOLD};
use crate::error::{KanadeError, Result};
use crate::frame::FramePair;

use super::region::{estimate, RegionGradient};
use super::GridGeometry;

/// The three per-cell derivative fields of one cycle, stored as display bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientFields {
    pub ix: Array2<u8>,
    pub iy: Array2<u8>,
    pub it: Array2<u8>,
}

impl GradientFields {
    /// Allocate zeroed fields shaped for `grid`.
    pub fn new(grid: &GridGeometry) -> Self {
        Self {
            ix: Array2::zeros(grid.dim()),
            iy: Array2::zeros(grid.dim()),
            it: Array2::zeros(grid.dim()),
        }
    }

    /// Field shape as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.ix.dim()
    }

    /// Named views of the fields, in Ix, Iy, It order.
    pub fn named(&self) -> [(&'static str, &Array2<u8>); 3] {
        [("ix", &self.ix), ("iy", &self.iy), ("it", &self.it)]
    }

    fn check_shape(&self, grid: &GridGeometry) -> Result<()> {
        for field in [&self.ix, &self.iy, &self.it] {
            if field.dim() != grid.dim() {
                return Err(KanadeError::FieldShapeMismatch {
                    expected_cols: grid.cols,
                    expected_rows: grid.rows,
                    cols: field.ncols(),
                    rows: field.nrows(),
                });
            }
        }
        Ok(())
    }

    fn write(&mut self, row: usize, col: usize, g: &RegionGradient) {
        self.ix[[row, col]] = rescale_to_byte(g.ix);
        self.iy[[row, col]] = rescale_to_byte(g.iy);
        self.it[[row, col]] = rescale_to_byte(g.it);
    }
}

/// Map a raw derivative in [-255, 255] to a display byte: `(255 + v) / 2`.
///
/// The result is truncated toward zero and saturates outside the nominal range.
pub fn rescale_to_byte(value: f64) -> u8 {
    if value.is_nan() {
        return (DISPLAY_MAX / 2.0) as u8;
    }
    ((DISPLAY_MAX + value) / 2.0).clamp(0.0, DISPLAY_MAX) as u8
}

/// Build freshly allocated Ix, Iy, It fields for a frame pair.
pub fn build_fields(pair: &FramePair, grid: &GridGeometry) -> Result<GradientFields> {
    let mut fields = GradientFields::new(grid);
    build_fields_into(pair, grid, &mut fields)?;
    Ok(fields)
}

/// Overwrite `fields` with the rescaled gradients of every grid cell.
///
/// Cells are visited in row-major order; field `(row, col)` holds the window
/// whose top-left corner is `(col * shift, row * shift)`.
pub fn build_fields_into(
    pair: &FramePair,
    grid: &GridGeometry,
    fields: &mut GradientFields,
) -> Result<()> {
    if pair.width() != grid.frame_width || pair.height() != grid.frame_height {
        return Err(KanadeError::FrameSizeMismatch {
            expected_width: grid.frame_width,
            expected_height: grid.frame_height,
            width: pair.width(),
            height: pair.height(),
        });
    }
    fields.check_shape(grid)?;

    let previous = &pair.previous().data;
    let current = &pair.current().data;

    if grid.cell_count() >= PARALLEL_CELL_THRESHOLD {
        let rows: Vec<Vec<RegionGradient>> = (0..grid.rows)
            .into_par_iter()
            .map(|row| {
                (0..grid.cols)
                    .map(|col| estimate(previous, current, grid.window, grid.origin(row, col)))
                    .collect()
            })
            .collect();

        for (row, cells) in rows.iter().enumerate() {
            for (col, g) in cells.iter().enumerate() {
                fields.write(row, col, g);
            }
        }
    } else {
        for (row, col, origin) in grid.origins() {
            let g = estimate(previous, current, grid.window, origin);
            fields.write(row, col, &g);
        }
    }

    Ok(())
}
