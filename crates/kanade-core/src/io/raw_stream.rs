use std::io::{ErrorKind, Read};

use crate::consts::MAX_RAW_FRAME_BYTES;
use crate::error::{KanadeError, Result};
use crate::frame::{Frame, FrameMetadata};

/// Bytes in one `width` x `height` gray frame.
///
/// Zero sides, overflow and frames above [`MAX_RAW_FRAME_BYTES`] are rejected.
pub fn raw_frame_size(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .filter(|&bytes| bytes > 0 && bytes <= MAX_RAW_FRAME_BYTES)
        .ok_or(KanadeError::InvalidDeviceSize { width, height })
}

/// Reads fixed-size 8-bit grayscale frames back to back from a byte stream.
pub struct RawStreamReader<R> {
    inner: R,
    width: usize,
    height: usize,
    frame_size: usize,
    frames_read: usize,
}

impl<R: Read> RawStreamReader<R> {
    pub fn new(inner: R, width: usize, height: usize) -> Result<Self> {
        let frame_size = raw_frame_size(width, height)?;
        Ok(Self {
            inner,
            width,
            height,
            frame_size,
            frames_read: 0,
        })
    }

    pub fn frame_byte_size(&self) -> usize {
        self.frame_size
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Read the next frame. Returns `None` on a clean end of stream.
    ///
    /// A stream ending inside a frame is an `UnexpectedEof` I/O error.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut pixels = vec![0u8; self.frame_byte_size()];
        let mut filled = 0;
        while filled < pixels.len() {
            match self.inner.read(&mut pixels[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < pixels.len() {
            return Err(KanadeError::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "raw stream ended mid-frame ({filled} of {} bytes)",
                    pixels.len()
                ),
            )));
        }

        let frame = Frame::from_raw(self.width, self.height, pixels)?.with_metadata(FrameMetadata {
            frame_index: self.frames_read,
            timestamp_us: None,
        });
        self.frames_read += 1;
        Ok(Some(frame))
    }
}
