mod sequence;
mod ser;
mod stream;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{DEFAULT_DEVICE_HEIGHT, DEFAULT_DEVICE_WIDTH, RAW_STREAM_EXTENSIONS};
use crate::error::{KanadeError, Result};
use crate::frame::{Frame, SourceInfo};
use crate::io::raw_stream::raw_frame_size;

pub use sequence::ImageSequenceSource;
pub use ser::SerSource;
pub use stream::RawStreamSource;

/// A producer of successive 8-bit grayscale frames.
pub trait FrameSource {
    fn info(&self) -> &SourceInfo;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Where frames come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum InputSpec {
    /// Raw grayscale frames on standard input.
    #[default]
    DefaultDevice,
    /// A SER file, an image directory, or a raw `.raw`/`.gray` stream file.
    Path(PathBuf),
}

impl std::fmt::Display for InputSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultDevice => write!(f, "default device (stdin)"),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Frame geometry for sources that carry no header of their own.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub width: usize,
    pub height: usize,
}

impl DeviceConfig {
    /// Reject sizes with a zero side or a frame too large to buffer.
    pub fn validate(&self) -> Result<()> {
        raw_frame_size(self.width, self.height).map(|_| ())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DEVICE_WIDTH,
            height: DEFAULT_DEVICE_HEIGHT,
        }
    }
}

/// Open the source named by `spec`.
///
/// Every failure to open is reported as [`KanadeError::InputUnavailable`].
pub fn open_source(spec: &InputSpec, device: &DeviceConfig) -> Result<Box<dyn FrameSource>> {
    let source: Result<Box<dyn FrameSource>> = match spec {
        InputSpec::DefaultDevice => {
            debug!(width = device.width, height = device.height, "Opening stdin stream");
            RawStreamSource::stdin(device.width, device.height)
                .map(|s| Box::new(s) as Box<dyn FrameSource>)
        }
        InputSpec::Path(path) => open_path(path, device),
    };

    let source = source.map_err(|e| match e {
        err @ KanadeError::InputUnavailable(_) => err,
        other => KanadeError::InputUnavailable(format!("{spec}: {other}")),
    })?;

    let info = source.info();
    info!(
        source = %info.description,
        width = info.width,
        height = info.height,
        frames = ?info.total_frames,
        "Frame source opened"
    );
    Ok(source)
}

fn open_path(path: &Path, device: &DeviceConfig) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        return Ok(Box::new(ImageSequenceSource::open(path)?));
    }
    if !path.exists() {
        return Err(KanadeError::InputUnavailable(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "ser" {
        Ok(Box::new(SerSource::open(path)?))
    } else if RAW_STREAM_EXTENSIONS.contains(&ext.as_str()) {
        Ok(Box::new(RawStreamSource::file(path, device.width, device.height)?))
    } else {
        Err(KanadeError::InputUnavailable(format!(
            "{}: unsupported input format",
            path.display()
        )))
    }
}
