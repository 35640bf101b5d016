pub mod config;
pub mod grid;
pub mod info;
pub mod run;

use anyhow::{bail, Result};
use clap::ValueEnum;
use kanade_core::gradient::{DegeneratePolicy, Window};
use kanade_core::pipeline::config::OutputFormat;

/// Parse a `WIDTHxHEIGHT` pair such as `5x5`.
pub fn parse_size(s: &str) -> Result<(usize, usize)> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got '{s}'");
    };
    Ok((w.trim().parse()?, h.trim().parse()?))
}

pub fn parse_window(s: &str) -> Result<Window> {
    let (width, height) = parse_size(s)?;
    Ok(Window::new(width, height)?)
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Png,
    Ser,
    None,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::PngSequence,
            FormatArg::Ser => OutputFormat::Ser,
            FormatArg::None => OutputFormat::Discard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DegenerateArg {
    Zero,
    MidGray,
    Unchanged,
}

impl From<DegenerateArg> for DegeneratePolicy {
    fn from(arg: DegenerateArg) -> Self {
        match arg {
            DegenerateArg::Zero => DegeneratePolicy::Zero,
            DegenerateArg::MidGray => DegeneratePolicy::MidGray,
            DegenerateArg::Unchanged => DegeneratePolicy::Unchanged,
        }
    }
}
