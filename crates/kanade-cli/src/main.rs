mod commands;
mod summary;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kanade", about = "Block-wise image gradients for Lucas-Kanade optical flow")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute Ix, Iy and It fields for every frame pair of an input
    Run(commands::run::RunArgs),
    /// Show frame source metadata
    Info(commands::info::InfoArgs),
    /// Show the gradient grid for a frame size
    Grid(commands::grid::GridArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Info(args) => commands::info::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Grid(args) => commands::grid::run(args).map(|()| ExitCode::SUCCESS),
        Commands::Config(args) => commands::config::run(args).map(|()| ExitCode::SUCCESS),
    }
}
