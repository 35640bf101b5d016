use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SHIFT;
use crate::error::{KanadeError, Result};
use crate::gradient::{DegeneratePolicy, Window};
use crate::preprocess::PreprocessConfig;
use crate::source::{DeviceConfig, InputSpec};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub input: InputSpec,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub gradient: GradientConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Stop after this many frame pairs. `None` runs until the source ends.
    #[serde(default)]
    pub max_cycles: Option<usize>,
}

impl FlowConfig {
    /// Reject degenerate geometry before any frame is read.
    pub fn validate(&self) -> Result<()> {
        self.gradient.validate()?;
        self.preprocess.validate()?;
        self.device.validate()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub window: Window,
    /// Step between window placements along each axis.
    pub shift: usize,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            window: Window::default(),
            shift: DEFAULT_SHIFT,
        }
    }
}

impl GradientConfig {
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        if self.shift == 0 {
            return Err(KanadeError::InvalidShift(self.shift));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub degenerate: DegeneratePolicy,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving rendered fields. `None` discards them.
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

/// How normalized fields are delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One PNG per field per cycle.
    #[default]
    PngSequence,
    /// One 8-bit SER recording per field.
    Ser,
    /// Fields are computed and dropped.
    Discard,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PngSequence => write!(f, "PNG sequence"),
            Self::Ser => write!(f, "SER"),
            Self::Discard => write!(f, "Discard"),
        }
    }
}
