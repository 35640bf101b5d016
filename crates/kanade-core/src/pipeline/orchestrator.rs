use tracing::{debug, info, warn};

use crate::error::{KanadeError, Result};
use crate::frame::{Frame, FramePair};
use crate::gradient::Normalization;
use crate::preprocess::{preprocess_frame, PreprocessConfig};
use crate::source::{open_source, FrameSource};

use super::config::FlowConfig;
use super::engine::GradientEngine;
use super::sink::{create_sink, FieldSink};
use super::types::{CycleReport, FlowSummary, NoOpReporter, PipelineStage, ProgressReporter};

/// Open the configured source and sink, then run the processing loop.
pub fn run_flow_reported(config: &FlowConfig, reporter: &dyn ProgressReporter) -> Result<FlowSummary> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Opening, None);
    let mut source = open_source(&config.input, &config.device)?;
    let mut sink = create_sink(&config.output)?;
    reporter.finish_stage();

    run_flow(config, source.as_mut(), sink.as_mut(), reporter)
}

/// Run the processing loop with no progress reporting.
pub fn run_flow_from_config(config: &FlowConfig) -> Result<FlowSummary> {
    run_flow_reported(config, &NoOpReporter)
}

/// Pull frames from `source` until it is exhausted, handing each cycle's
/// normalized fields to `sink`.
///
/// The source must yield at least two frames; otherwise the input is
/// reported unavailable and the sink is never touched.
pub fn run_flow(
    config: &FlowConfig,
    source: &mut dyn FrameSource,
    sink: &mut dyn FieldSink,
    reporter: &dyn ProgressReporter,
) -> Result<FlowSummary> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Priming, Some(2));
    let first = next_prepared(source, &config.preprocess)?;
    let second = next_prepared(source, &config.preprocess)?;
    let (Some(first), Some(second)) = (first, second) else {
        return Err(KanadeError::InputUnavailable(format!(
            "{} did not produce an initial frame pair",
            source.info().description
        )));
    };
    let pair = FramePair::new(first, second)?;
    reporter.finish_stage();

    let mut engine = GradientEngine::for_frame_size(
        pair.width(),
        pair.height(),
        &config.gradient,
        config.normalize.degenerate,
    )?;
    let grid = *engine.grid();
    info!(
        frame_width = grid.frame_width,
        frame_height = grid.frame_height,
        window = %grid.window,
        shift = grid.shift,
        grid_cols = grid.cols,
        grid_rows = grid.rows,
        "Gradient grid ready"
    );

    let expected_cycles = source
        .info()
        .total_frames
        .map(|n| n.saturating_sub(1))
        .map(|n| config.max_cycles.map_or(n, |max| n.min(max)))
        .or(config.max_cycles);
    reporter.begin_stage(PipelineStage::Differentiating, expected_cycles);

    let outcome = run_cycles(config, source, sink, reporter, &mut engine, pair);
    reporter.finish_stage();
    let (cycles, degenerate_cycles) = match outcome {
        Ok(counts) => counts,
        Err(err) => {
            // Close the sink so fields already presented stay readable.
            warn!(error = %err, "Run stopped early, finishing output");
            if let Err(finish_err) = sink.finish() {
                warn!(error = %finish_err, "Could not finish output");
            }
            return Err(err);
        }
    };

    reporter.begin_stage(PipelineStage::Finishing, None);
    sink.finish()?;
    reporter.finish_stage();

    if degenerate_cycles > 0 {
        warn!(
            degenerate_cycles,
            policy = %config.normalize.degenerate,
            "Some fields were constant and could not be stretched"
        );
    }
    info!(cycles, "Gradient run complete");

    Ok(FlowSummary {
        source: source.info().description.clone(),
        cycles,
        frame_width: grid.frame_width,
        frame_height: grid.frame_height,
        grid_cols: grid.cols,
        grid_rows: grid.rows,
        degenerate_cycles,
    })
}

/// Process pairs until the source ends or the cycle limit is hit.
///
/// Returns `(cycles, degenerate_cycles)`.
fn run_cycles(
    config: &FlowConfig,
    source: &mut dyn FrameSource,
    sink: &mut dyn FieldSink,
    reporter: &dyn ProgressReporter,
    engine: &mut GradientEngine,
    mut pair: FramePair,
) -> Result<(usize, usize)> {
    let mut cycles = 0usize;
    let mut degenerate_cycles = 0usize;
    loop {
        if config.max_cycles.is_some_and(|max| cycles >= max) {
            info!(cycles, "Cycle limit reached");
            break;
        }

        let report = engine.process(&pair)?;
        if is_degenerate(&report) {
            degenerate_cycles += 1;
            debug!(cycle = cycles, ?report, "Constant field in cycle");
        }
        sink.present(cycles, pair.current(), engine.fields())?;
        cycles += 1;
        reporter.advance(cycles);

        if config.max_cycles.is_some_and(|max| cycles >= max) {
            continue;
        }
        match next_prepared(source, &config.preprocess)? {
            Some(next) => pair = pair.advance(next)?,
            None => {
                debug!(cycles, "Frame source exhausted");
                break;
            }
        }
    }
    Ok((cycles, degenerate_cycles))
}

fn next_prepared(source: &mut dyn FrameSource, config: &PreprocessConfig) -> Result<Option<Frame>> {
    source
        .next_frame()?
        .map(|frame| preprocess_frame(frame, config))
        .transpose()
}

fn is_degenerate(report: &CycleReport) -> bool {
    [report.ix, report.iy, report.it]
        .iter()
        .any(|n| matches!(n, Normalization::Degenerate { .. }))
}
