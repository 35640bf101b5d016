use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::frame::{Frame, SourceInfo};
use crate::io::raw_stream::RawStreamReader;

use super::FrameSource;

/// Raw grayscale frames from stdin, a file, or any other byte stream.
pub struct RawStreamSource {
    reader: RawStreamReader<Box<dyn Read>>,
    info: SourceInfo,
}

impl RawStreamSource {
    pub fn new(
        inner: Box<dyn Read>,
        description: impl Into<String>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let reader = RawStreamReader::new(inner, width, height)?;
        let info = SourceInfo::mono8(description, width as u32, height as u32);
        Ok(Self { reader, info })
    }

    /// Frames piped on standard input.
    pub fn stdin(width: usize, height: usize) -> Result<Self> {
        let stdin = BufReader::new(std::io::stdin());
        Self::new(Box::new(stdin), "stdin", width, height)
    }

    /// Frames stored back to back in a file.
    pub fn file(path: &Path, width: usize, height: usize) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut source = Self::new(Box::new(file), path.display().to_string(), width, height)?;
        let len = std::fs::metadata(path)?.len() as usize;
        source.info.total_frames = Some(len / source.reader.frame_byte_size());
        Ok(source)
    }
}

impl FrameSource for RawStreamSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.reader.read_frame()
    }
}
