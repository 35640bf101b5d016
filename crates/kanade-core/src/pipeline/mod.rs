pub mod config;
mod engine;
mod orchestrator;
pub mod sink;
mod types;

pub use engine::GradientEngine;
pub use orchestrator::{run_flow, run_flow_from_config, run_flow_reported};
pub use types::{CycleReport, FlowSummary, NoOpReporter, PipelineStage, ProgressReporter};
