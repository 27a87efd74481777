//! Audio container header reading.
//!
//! Only the metadata needed for timeline placement is read: frame count,
//! native sample rate, and the absolute recording position embedded by the
//! recorder (BWF `bext` time reference for WAV, `MARK` timestamps for AIFF).
//! Sample data is never touched.

mod aiff;
mod chunk;
mod wav;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use thiserror::Error;

/// Sample rate reported when a header cannot be read.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Metadata chunks (`fmt `, `COMM`, `bext`, `MARK`) are small; anything larger
/// than this is treated as a corrupt size field.
const MAX_METADATA_CHUNK: u32 = 1 << 20;

/// What the timeline needs to know about one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioHeader {
    pub frame_count: u64,
    pub sample_rate: u32,
    /// Absolute sample position of the first recorded frame on the
    /// recorder's timeline, when the file carries one.
    pub timeline_origin: Option<u64>,
}

impl Default for AudioHeader {
    fn default() -> Self {
        Self {
            frame_count: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            timeline_origin: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("header truncated")]
    Truncated,
    #[error("unexpected container id {}", String::from_utf8_lossy(.found))]
    BadMagic { found: [u8; 4] },
    #[error("chunk {} claims {size} bytes", String::from_utf8_lossy(.id))]
    ChunkTooLarge { id: [u8; 4], size: u32 },
    #[error("required chunk '{0}' not found")]
    MissingChunk(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("no header reader for .{0} files")]
    Unsupported(String),
}

/// Container formats with a header reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Aiff,
}

impl AudioFormat {
    /// Pick a reader from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" | "wave" | "bwf" => Some(Self::Wav),
            "aif" | "aiff" | "aifc" => Some(Self::Aiff),
            _ => None,
        }
    }
}

/// Read a file's header, substituting [`AudioHeader::default`] for anything
/// malformed, truncated, unreadable, or in a format without a reader.
pub fn read_header(path: &Path) -> AudioHeader {
    match try_read_header(path) {
        Ok(header) => header,
        Err(e) => {
            log::debug!("using default header for {}: {e}", path.display());
            AudioHeader::default()
        }
    }
}

/// Read a file's header, reporting why it could not be read.
pub fn try_read_header(path: &Path) -> Result<AudioHeader, HeaderError> {
    let format = AudioFormat::from_path(path).ok_or_else(|| {
        HeaderError::Unsupported(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;
    let file = BufReader::new(File::open(path)?);
    read_header_from(file, format)
}

/// Read a header from any seekable source.
pub fn read_header_from<R: Read + Seek>(reader: R, format: AudioFormat) -> Result<AudioHeader, HeaderError> {
    match format {
        AudioFormat::Wav => wav::read_wav(reader),
        AudioFormat::Aiff => aiff::read_aiff(reader),
    }
}
