use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::frame::Frame;
use crate::gradient::GradientFields;
use crate::io::image_io::save_png;
use crate::io::ser_writer::SerWriter;

use super::config::{OutputConfig, OutputFormat};

/// Receives the normalized fields of every cycle.
pub trait FieldSink {
    /// Deliver one cycle. `frame` is the current (preprocessed) frame.
    fn present(&mut self, cycle: usize, frame: &Frame, fields: &GradientFields) -> Result<()>;

    /// Called once after the last cycle.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Drops everything it is given.
pub struct NullSink;

impl FieldSink for NullSink {
    fn present(&mut self, _cycle: usize, _frame: &Frame, _fields: &GradientFields) -> Result<()> {
        Ok(())
    }
}

/// Writes `original_NNNNNN.png`, `ix_NNNNNN.png`, `iy_NNNNNN.png` and
/// `it_NNNNNN.png` per cycle.
pub struct PngSequenceSink {
    dir: PathBuf,
}

impl PngSequenceSink {
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, name: &str, cycle: usize) -> PathBuf {
        self.dir.join(format!("{name}_{cycle:06}.png"))
    }
}

impl FieldSink for PngSequenceSink {
    fn present(&mut self, cycle: usize, frame: &Frame, fields: &GradientFields) -> Result<()> {
        save_png(&frame.data, &self.path_for("original", cycle))?;
        for (name, field) in fields.named() {
            save_png(field, &self.path_for(name, cycle))?;
        }
        debug!(cycle, dir = %self.dir.display(), "Fields written");
        Ok(())
    }
}

/// Records each field as its own 8-bit SER video: `ix.ser`, `iy.ser`, `it.ser`.
pub struct SerSink {
    dir: PathBuf,
    writers: Option<[SerWriter; 3]>,
}

impl SerSink {
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            writers: None,
        })
    }

    fn open_writers(&self, fields: &GradientFields) -> Result<[SerWriter; 3]> {
        let (rows, cols) = fields.dim();
        let [ix, iy, it] = fields.named().map(|(name, _)| self.dir.join(format!("{name}.ser")));
        Ok([
            SerWriter::create(&ix, cols as u32, rows as u32)?,
            SerWriter::create(&iy, cols as u32, rows as u32)?,
            SerWriter::create(&it, cols as u32, rows as u32)?,
        ])
    }
}

impl FieldSink for SerSink {
    fn present(&mut self, _cycle: usize, _frame: &Frame, fields: &GradientFields) -> Result<()> {
        let writers = match self.writers.take() {
            Some(w) => w,
            None => self.open_writers(fields)?,
        };
        let writers = self.writers.insert(writers);
        for (writer, (_, field)) in writers.iter_mut().zip(fields.named()) {
            writer.write_frame(field)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writers) = self.writers.take() {
            let frames = writers[0].frames_written();
            for writer in writers {
                writer.finalize()?;
            }
            info!(frames, dir = %self.dir.display(), "SER recordings finalized");
        }
        Ok(())
    }
}

/// Build the sink selected by `output`.
pub fn create_sink(output: &OutputConfig) -> Result<Box<dyn FieldSink>> {
    let Some(dir) = output.dir.as_deref() else {
        return Ok(Box::new(NullSink));
    };
    Ok(match output.format {
        OutputFormat::PngSequence => Box::new(PngSequenceSink::create(dir)?),
        OutputFormat::Ser => Box::new(SerSink::create(dir)?),
        OutputFormat::Discard => Box::new(NullSink),
    })
}
