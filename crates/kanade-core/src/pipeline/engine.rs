use crate::error::Result;
use crate::frame::FramePair;
use crate::gradient::{build_fields_into, normalize_field, DegeneratePolicy, GradientFields, GridGeometry};

use super::config::GradientConfig;
use super::types::CycleReport;

/// Owns the grid geometry and the three output fields for a run.
///
/// Fields are allocated once and overwritten by every call to [`process`](Self::process).
pub struct GradientEngine {
    grid: GridGeometry,
    fields: GradientFields,
    policy: DegeneratePolicy,
}

impl GradientEngine {
    pub fn new(grid: GridGeometry, policy: DegeneratePolicy) -> Self {
        Self {
            fields: GradientFields::new(&grid),
            grid,
            policy,
        }
    }

    /// Build an engine for frames of the given size.
    pub fn for_frame_size(
        frame_width: usize,
        frame_height: usize,
        config: &GradientConfig,
        policy: DegeneratePolicy,
    ) -> Result<Self> {
        let grid = GridGeometry::new(frame_width, frame_height, config.window, config.shift)?;
        Ok(Self::new(grid, policy))
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    pub fn fields(&self) -> &GradientFields {
        &self.fields
    }

    /// Compute and normalize Ix, Iy and It for one frame pair.
    pub fn process(&mut self, pair: &FramePair) -> Result<CycleReport> {
        build_fields_into(pair, &self.grid, &mut self.fields)?;
        Ok(CycleReport {
            ix: normalize_field(&mut self.fields.ix, self.policy),
            iy: normalize_field(&mut self.fields.iy, self.policy),
            it: normalize_field(&mut self.fields.it, self.policy),
        })
    }
}
