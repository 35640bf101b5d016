use crate::gradient::Normalization;

/// Processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Opening,
    Priming,
    Differentiating,
    Finishing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opening => write!(f, "Opening input"),
            Self::Priming => write!(f, "Reading first frames"),
            Self::Differentiating => write!(f, "Computing gradients"),
            Self::Finishing => write!(f, "Finishing output"),
        }
    }
}

/// Per-field normalization outcomes of one cycle, in Ix, Iy, It order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub ix: Normalization,
    pub iy: Normalization,
    pub it: Normalization,
}

/// What a completed run processed.
#[derive(Clone, Debug)]
pub struct FlowSummary {
    pub source: String,
    pub cycles: usize,
    pub frame_width: usize,
    pub frame_height: usize,
    pub grid_cols: usize,
    pub grid_rows: usize,
    /// Cycles in which at least one field was constant.
    pub degenerate_cycles: usize,
}

/// Progress reporting for the processing loop.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new stage has started. `total_items` is the number of cycles, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One cycle within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
