use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use kanade_core::gradient::grid_extent;
use kanade_core::pipeline::config::GradientConfig;
use kanade_core::preprocess::PreprocessConfig;
use kanade_core::source::{open_source, DeviceConfig, InputSpec};

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file, image directory, or raw .gray stream (default: raw frames on stdin)
    pub input: Option<PathBuf>,

    /// Width of raw stream frames
    #[arg(long, default_value = "640")]
    pub width: usize,

    /// Height of raw stream frames
    #[arg(long, default_value = "480")]
    pub height: usize,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let device = DeviceConfig {
        width: args.width,
        height: args.height,
    };
    device.validate()?;
    let spec = args
        .input
        .clone()
        .map_or(InputSpec::DefaultDevice, InputSpec::Path);
    let source = open_source(&spec, &device)?;
    let info = source.info();

    println!("Source:      {}", info.description);
    match info.total_frames {
        Some(n) => println!("Frames:      {}", n),
        None => println!("Frames:      unknown"),
    }
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref tel) = info.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    let preprocess = PreprocessConfig::default();
    let gradient = GradientConfig::default();
    if let Ok((w, h)) = preprocess.target_size(info.width as usize, info.height as usize) {
        println!(
            "Default grid: {}x{} cells (frames {}x{}, window {}, shift {})",
            grid_extent(w, gradient.window.width, gradient.shift),
            grid_extent(h, gradient.window.height, gradient.shift),
            w,
            h,
            gradient.window,
            gradient.shift
        );
    }

    Ok(())
}
