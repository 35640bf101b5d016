use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use kanade_core::error::KanadeError;
use kanade_core::pipeline::config::{FlowConfig, GradientConfig, NormalizeConfig, OutputConfig};
use kanade_core::pipeline::{run_flow_reported, PipelineStage, ProgressReporter};
use kanade_core::preprocess::PreprocessConfig;
use kanade_core::source::{DeviceConfig, InputSpec};
use tracing::error;

use super::{parse_window, DegenerateArg, FormatArg};
use crate::summary::{print_flow_result, print_run_summary};

/// Exit code used when the input cannot be opened or yields no frame pair.
const EXIT_INPUT_UNAVAILABLE: u8 = 2;

#[derive(Args)]
pub struct RunArgs {
    /// Input SER file, image directory, or raw .gray stream (default: raw frames on stdin)
    pub input: Option<PathBuf>,

    /// Flow config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sampling window as WIDTHxHEIGHT
    #[arg(long, default_value = "5x5")]
    pub window: String,

    /// Step between window placements
    #[arg(long, default_value = "2")]
    pub shift: usize,

    /// Factor frames are shrunk by before differentiation
    #[arg(long, default_value = "2.5")]
    pub downscale: f32,

    /// Width of raw stream frames
    #[arg(long, default_value = "640")]
    pub width: usize,

    /// Height of raw stream frames
    #[arg(long, default_value = "480")]
    pub height: usize,

    /// What to output for a constant field
    #[arg(long, value_enum, default_value = "zero")]
    pub degenerate: DegenerateArg,

    /// Stop after this many frame pairs
    #[arg(long)]
    pub max_cycles: Option<usize>,

    /// Output directory for rendered fields
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "png")]
    pub format: FormatArg,
}

pub fn run(args: &RunArgs) -> Result<ExitCode> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: FlowConfig = toml::from_str(&contents).context("Invalid flow config")?;
        if let Some(ref input) = args.input {
            config.input = InputSpec::Path(input.clone());
        }
        config
    } else {
        build_config_from_args(args)?
    };
    config.validate().context("Invalid gradient configuration")?;

    print_run_summary(&config);

    let reporter = BarReporter::new()?;
    let result = run_flow_reported(&config, &reporter);
    reporter.pb.finish_and_clear();

    match result {
        Ok(summary) => {
            print_flow_result(&summary, &config);
            Ok(ExitCode::SUCCESS)
        }
        Err(KanadeError::InputUnavailable(reason)) => {
            error!(%reason, "Input unavailable");
            eprintln!("Error: could not load a camera or video: {reason}");
            Ok(ExitCode::from(EXIT_INPUT_UNAVAILABLE))
        }
        Err(e) => Err(anyhow::Error::new(e).context("Gradient run failed")),
    }
}

fn build_config_from_args(args: &RunArgs) -> Result<FlowConfig> {
    Ok(FlowConfig {
        input: args
            .input
            .clone()
            .map_or(InputSpec::DefaultDevice, InputSpec::Path),
        device: DeviceConfig {
            width: args.width,
            height: args.height,
        },
        gradient: GradientConfig {
            window: parse_window(&args.window)?,
            shift: args.shift,
        },
        preprocess: PreprocessConfig {
            downscale: args.downscale,
        },
        normalize: NormalizeConfig {
            degenerate: args.degenerate.into(),
        },
        output: OutputConfig {
            dir: args.output.clone(),
            format: args.format.into(),
        },
        max_cycles: args.max_cycles,
    })
}

/// Drives an indicatif bar (known length) or spinner (live streams).
struct BarReporter {
    pb: ProgressBar,
    bar_style: ProgressStyle,
    spinner_style: ProgressStyle,
}

impl BarReporter {
    fn new() -> Result<Self> {
        Ok(Self {
            pb: ProgressBar::new(0),
            bar_style: ProgressStyle::default_bar()
                .template("{msg:22} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
            spinner_style: ProgressStyle::default_spinner().template("{spinner} {msg:22} {pos}")?,
        })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        match total_items {
            Some(total) => {
                self.pb.set_style(self.bar_style.clone());
                self.pb.set_length(total as u64);
            }
            None => self.pb.set_style(self.spinner_style.clone()),
        }
        self.pb.set_position(0);
        self.pb.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.pb.tick();
    }
}
