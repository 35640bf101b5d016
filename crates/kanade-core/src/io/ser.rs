use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::error::{KanadeError, Result};
use crate::frame::{ColorMode, Frame, FrameMetadata, SourceInfo};
use crate::preprocess::luminance_u8;

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// Byte offset of the FrameCount field inside the header.
pub const SER_FRAME_COUNT_OFFSET: u64 = 38;

const SER_TEXT_FIELD_LEN: usize = 40;
const SER_TIMESTAMP_LEN: usize = 8;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Header for an 8-bit mono recording.
    pub fn mono8(width: u32, height: u32, frame_count: u32) -> Self {
        Self {
            color_id: 0,
            little_endian: true,
            width,
            height,
            pixel_depth: 8,
            frame_count,
            observer: String::new(),
            instrument: String::new(),
            telescope: String::new(),
            date_time: 0,
            date_time_utc: 0,
        }
    }

    /// Parse the fixed-size header block, magic included.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < SER_HEADER_SIZE {
            return Err(KanadeError::InvalidSer("File too small for SER header".into()));
        }
        if &buf[..SER_MAGIC.len()] != SER_MAGIC {
            return Err(KanadeError::InvalidSer("Missing LUCAM-RECORDER magic".into()));
        }

        let mut cursor = Cursor::new(&buf[SER_MAGIC.len()..SER_HEADER_SIZE]);
        let _lu_id = cursor.read_i32::<LittleEndian>()?;
        let color_id = cursor.read_i32::<LittleEndian>()?;
        // Most capture tools write 0 for little-endian data; only 1 means big-endian.
        let little_endian = cursor.read_i32::<LittleEndian>()? != 1;
        let width = cursor.read_i32::<LittleEndian>()? as u32;
        let height = cursor.read_i32::<LittleEndian>()? as u32;
        let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
        let frame_count = cursor.read_i32::<LittleEndian>()? as u32;
        let observer = read_text_field(&mut cursor)?;
        let instrument = read_text_field(&mut cursor)?;
        let telescope = read_text_field(&mut cursor)?;
        let date_time = cursor.read_u64::<LittleEndian>()?;
        let date_time_utc = cursor.read_u64::<LittleEndian>()?;

        if width == 0 || height == 0 {
            return Err(KanadeError::InvalidDimensions { width, height });
        }
        if !(1..=16).contains(&pixel_depth) {
            return Err(KanadeError::InvalidSer(format!(
                "Unsupported pixel depth {pixel_depth}"
            )));
        }

        Ok(Self {
            color_id,
            little_endian,
            width,
            height,
            pixel_depth,
            frame_count,
            observer,
            instrument,
            telescope,
            date_time,
            date_time_utc,
        })
    }

    /// 1 for samples up to 8 bits, 2 for 9-16 bits.
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// 3 for interleaved RGB/BGR, 1 for mono and Bayer mosaics.
    pub fn samples_per_pixel(&self) -> usize {
        match self.color_mode() {
            ColorMode::RGB | ColorMode::BGR => 3,
            _ => 1,
        }
    }

    /// Bytes in one frame, or `None` if the size overflows.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.samples_per_pixel())
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            100 => ColorMode::RGB,
            101 => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER file reader producing 8-bit grayscale frames.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
    frame_size: usize,
    trailer_offset: usize,
}

impl SerReader {
    /// Open a SER file and check that it holds every frame its header announces.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let header = SerHeader::parse(&mmap)?;

        let frame_size = header
            .frame_byte_size()
            .ok_or_else(|| KanadeError::InvalidSer("Frame size overflows".into()))?;
        let trailer_offset = frame_size
            .checked_mul(header.frame_count as usize)
            .and_then(|size| size.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| KanadeError::InvalidSer("Frame data size overflows".into()))?;
        if mmap.len() < trailer_offset {
            return Err(KanadeError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                trailer_offset,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            frame_size,
            trailer_offset,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Raw bytes of one frame, borrowed from the mapping.
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        if index >= self.frame_count() {
            return Err(KanadeError::FrameIndexOutOfRange {
                index,
                total: self.frame_count(),
            });
        }
        let start = SER_HEADER_SIZE + index * self.frame_size;
        Ok(&self.mmap[start..start + self.frame_size])
    }

    /// Read a single frame as 8-bit luma.
    ///
    /// Deeper samples are shifted down to 8 bits; RGB/BGR pixels are reduced
    /// with BT.601 weights; Bayer mosaics are read as-is.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let decoder = SampleDecoder::for_header(&self.header);
        let shape = (self.header.height as usize, self.header.width as usize);

        let data = match self.header.color_mode() {
            ColorMode::RGB => decoder.luma_plane(raw, shape, [0, 1, 2]),
            ColorMode::BGR => decoder.luma_plane(raw, shape, [2, 1, 0]),
            _ => decoder.mono_plane(raw, shape),
        };

        Ok(Frame::new(data).with_metadata(FrameMetadata {
            frame_index: index,
            timestamp_us: self.timestamp(index),
        }))
    }

    /// Capture time of frame `index` from the optional trailer that follows the frame data.
    fn timestamp(&self, index: usize) -> Option<u64> {
        let start = self.trailer_offset + index * SER_TIMESTAMP_LEN;
        let mut bytes = self.mmap.get(start..start + SER_TIMESTAMP_LEN)?;
        bytes.read_u64::<LittleEndian>().ok()
    }

    pub fn source_info(&self, path: &Path) -> SourceInfo {
        let text = |s: &str| (!s.is_empty()).then(|| s.to_string());
        SourceInfo {
            description: path.display().to_string(),
            total_frames: Some(self.frame_count()),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            observer: text(&self.header.observer),
            telescope: text(&self.header.telescope),
            instrument: text(&self.header.instrument),
        }
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

fn read_text_field(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let mut field = [0u8; SER_TEXT_FIELD_LEN];
    cursor.read_exact(&mut field)?;
    Ok(String::from_utf8_lossy(&field)
        .trim_end_matches('\0')
        .trim()
        .to_string())
}

/// Turns the stored samples of one frame into bytes.
struct SampleDecoder {
    bytes_per_sample: usize,
    shift: u32,
    little_endian: bool,
}

impl SampleDecoder {
    fn for_header(header: &SerHeader) -> Self {
        Self {
            bytes_per_sample: header.bytes_per_sample(),
            shift: header.pixel_depth.saturating_sub(8),
            little_endian: header.little_endian,
        }
    }

    /// The `n`-th sample of `raw`, reduced to 8 bits.
    fn sample(&self, raw: &[u8], n: usize) -> u8 {
        if self.bytes_per_sample == 1 {
            return raw[n];
        }
        let pair = [raw[2 * n], raw[2 * n + 1]];
        let value = if self.little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        };
        (value >> self.shift).min(u8::MAX as u16) as u8
    }

    fn mono_plane(&self, raw: &[u8], shape: (usize, usize)) -> Array2<u8> {
        let width = shape.1;
        Array2::from_shape_fn(shape, |(row, col)| self.sample(raw, row * width + col))
    }

    /// Interleaved three-sample pixels; `order` gives the R, G, B sample positions.
    fn luma_plane(&self, raw: &[u8], shape: (usize, usize), order: [usize; 3]) -> Array2<u8> {
        let width = shape.1;
        Array2::from_shape_fn(shape, |(row, col)| {
            let first = 3 * (row * width + col);
            let [r, g, b] = order.map(|c| self.sample(raw, first + c));
            luminance_u8(r, g, b)
        })
    }
}
