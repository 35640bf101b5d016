use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::Array2;

use crate::error::{KanadeError, Result};
use crate::io::ser::{SerHeader, SER_FRAME_COUNT_OFFSET, SER_MAGIC};

const TEXT_FIELD_LEN: usize = 40;

/// Writes an 8-bit mono SER file one frame at a time.
///
/// The header frame count is rewritten on [`SerWriter::finalize`], so the
/// number of frames does not need to be known when the file is created.
pub struct SerWriter {
    out: BufWriter<File>,
    width: usize,
    height: usize,
    frames_written: u32,
}

impl SerWriter {
    /// Create the file and write a header announcing zero frames.
    pub fn create(path: &Path, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(KanadeError::InvalidDimensions { width, height });
        }
        let mut out = BufWriter::new(File::create(path)?);
        write_header(&mut out, &SerHeader::mono8(width, height, 0))?;
        Ok(Self {
            out,
            width: width as usize,
            height: height as usize,
            frames_written: 0,
        })
    }

    /// Append one frame. Its shape must match the header.
    pub fn write_frame(&mut self, data: &Array2<u8>) -> Result<()> {
        let (height, width) = data.dim();
        if (width, height) != (self.width, self.height) {
            return Err(KanadeError::FrameSizeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width,
                height,
            });
        }
        if let Some(bytes) = data.as_slice() {
            self.out.write_all(bytes)?;
        } else {
            for row in data.rows() {
                let bytes: Vec<u8> = row.iter().copied().collect();
                self.out.write_all(&bytes)?;
            }
        }
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Flush frame data, then patch the real frame count into the header.
    pub fn finalize(self) -> Result<()> {
        let mut file = self
            .out
            .into_inner()
            .map_err(|e| KanadeError::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(SER_FRAME_COUNT_OFFSET))?;
        file.write_i32::<LittleEndian>(self.frames_written as i32)?;
        file.flush()?;
        Ok(())
    }
}

fn write_header(out: &mut impl Write, header: &SerHeader) -> Result<()> {
    out.write_all(SER_MAGIC)?;
    out.write_i32::<LittleEndian>(0)?; // LuID
    out.write_i32::<LittleEndian>(header.color_id)?;
    out.write_i32::<LittleEndian>(if header.little_endian { 0 } else { 1 })?;
    for value in [header.width, header.height, header.pixel_depth, header.frame_count] {
        out.write_i32::<LittleEndian>(value as i32)?;
    }
    for text in [&header.observer, &header.instrument, &header.telescope] {
        let mut field = [0u8; TEXT_FIELD_LEN];
        let len = text.len().min(TEXT_FIELD_LEN);
        field[..len].copy_from_slice(&text.as_bytes()[..len]);
        out.write_all(&field)?;
    }
    out.write_u64::<LittleEndian>(header.date_time)?;
    out.write_u64::<LittleEndian>(header.date_time_utc)?;
    Ok(())
}
