use anyhow::Result;
use clap::Args;
use kanade_core::gradient::GridGeometry;

use super::{parse_size, parse_window};

#[derive(Args)]
pub struct GridArgs {
    /// Frame size as WIDTHxHEIGHT (after any downscaling)
    #[arg(long)]
    pub frame: String,

    /// Sampling window as WIDTHxHEIGHT
    #[arg(long, default_value = "5x5")]
    pub window: String,

    /// Step between window placements
    #[arg(long, default_value = "2")]
    pub shift: usize,
}

pub fn run(args: &GridArgs) -> Result<()> {
    let (frame_width, frame_height) = parse_size(&args.frame)?;
    let window = parse_window(&args.window)?;
    let grid = GridGeometry::new(frame_width, frame_height, window, args.shift)?;

    println!("Frame:   {}x{}", grid.frame_width, grid.frame_height);
    println!("Window:  {}", grid.window);
    println!("Shift:   {}", grid.shift);
    println!("Grid:    {}x{} ({} cells)", grid.cols, grid.rows, grid.cell_count());

    Ok(())
}
