use std::path::Path;

use crate::error::Result;
use crate::frame::{Frame, SourceInfo};
use crate::io::ser::SerReader;

use super::FrameSource;

/// Plays a SER recording front to back.
pub struct SerSource {
    reader: SerReader,
    info: SourceInfo,
    next_index: usize,
}

impl SerSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = SerReader::open(path)?;
        let info = reader.source_info(path);
        Ok(Self {
            reader,
            info,
            next_index: 0,
        })
    }
}

impl FrameSource for SerSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next_index >= self.reader.frame_count() {
            return Ok(None);
        }
        let frame = self.reader.read_frame(self.next_index)?;
        self.next_index += 1;
        Ok(Some(frame))
    }
}
