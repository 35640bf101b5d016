use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{KanadeError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};
use crate::io::image_io::{list_image_sequence, load_image};

use super::FrameSource;

/// Reads a directory of still images in file-name order.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    info: SourceInfo,
    next_index: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let paths = list_image_sequence(dir)?;
        let Some(first) = paths.first() else {
            return Err(KanadeError::InputUnavailable(format!(
                "{} contains no images",
                dir.display()
            )));
        };

        let probe = image::image_dimensions(first)?;
        let mut info = SourceInfo::mono8(dir.display().to_string(), probe.0, probe.1);
        info.total_frames = Some(paths.len());
        debug!(count = paths.len(), dir = %dir.display(), "Image sequence listed");

        Ok(Self {
            paths,
            info,
            next_index: 0,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.paths.get(self.next_index) else {
            return Ok(None);
        };
        let frame = load_image(path)?.with_metadata(FrameMetadata {
            frame_index: self.next_index,
            timestamp_us: None,
        });
        self.next_index += 1;
        Ok(Some(frame))
    }
}
