use std::io::{Read, Seek};

use super::chunk::{read_u16, read_u32, read_u64, ChunkWalker, Endianness};
use super::{AudioHeader, HeaderError, MAX_METADATA_CHUNK};

/// Marker name prefix carrying the absolute timeline position of frame 0.
const TIMESTAMP_MARKER_PREFIX: &str = "Timestamp: ";
/// Marker placed where recorded content begins, after pre-roll.
const START_MARKER: &str = "Start";

/// Markers of interest found in a `MARK` chunk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct TimelineMarkers {
    pub timestamp: Option<i64>,
    pub start_offset: u32,
}

impl TimelineMarkers {
    /// Absolute timeline position of the first recorded sample.
    /// Negative results are floored at zero.
    pub fn content_origin(self) -> Option<u64> {
        self.timestamp.map(|ts| {
            let origin = ts.saturating_add(i64::from(self.start_offset));
            u64::try_from(origin).unwrap_or(0)
        })
    }
}

/// Read frame count and sample rate from `COMM`, plus the recording position
/// encoded in `MARK`, from a FORM/AIFF or FORM/AIFC file.
pub(super) fn read_aiff<R: Read + Seek>(reader: R) -> Result<AudioHeader, HeaderError> {
    let (mut walker, form) = ChunkWalker::open(reader, b"FORM", Endianness::Big)?;
    if &form != b"AIFF" && &form != b"AIFC" {
        return Err(HeaderError::BadMagic { found: form });
    }

    let mut common = None;
    let mut markers = TimelineMarkers::default();

    while let Some(chunk) = walker.next_chunk()? {
        match &chunk.id {
            b"COMM" => {
                let comm = walker.read_payload(&chunk, MAX_METADATA_CHUNK)?;
                let frames = read_u32(&comm, 2, Endianness::Big).ok_or(HeaderError::Truncated)?;
                let rate_bytes: [u8; 10] = comm
                    .get(8..18)
                    .and_then(|b| b.try_into().ok())
                    .ok_or(HeaderError::Truncated)?;
                common = Some((frames, decode_extended_rate(&rate_bytes)));
            }
            b"MARK" => {
                let mark = walker.read_payload(&chunk, MAX_METADATA_CHUNK)?;
                markers = parse_markers(&mark);
            }
            _ => {}
        }
    }

    let (frames, sample_rate) = common.ok_or(HeaderError::MissingChunk("COMM"))?;
    if sample_rate == 0 {
        return Err(HeaderError::Invalid("COMM sample rate is zero".into()));
    }

    Ok(AudioHeader {
        frame_count: u64::from(frames),
        sample_rate,
        timeline_origin: markers.content_origin(),
    })
}

/// Decode the 80-bit IEEE 754 extended float AIFF uses for its sample rate.
///
/// The sign bit is ignored; values that do not fit a `u32` decode as zero.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn decode_extended_rate(raw: &[u8; 10]) -> u32 {
    let [hi, lo, ..] = *raw;
    let exponent = (i32::from(hi & 0x7F) << 8) | i32::from(lo);
    let mantissa = read_u64(raw, 2, Endianness::Big).unwrap_or(0);
    if exponent == 0 && mantissa == 0 {
        return 0;
    }
    let rate = mantissa as f64 * 2f64.powi(exponent - 16383 - 63);
    if rate.is_finite() && rate >= 0.0 && rate <= f64::from(u32::MAX) {
        rate as u32
    } else {
        0
    }
}

/// Parse a `MARK` payload: a 16-bit count followed by
/// (id: u16, position: u32, name: pstring padded to even length) entries.
/// Parsing stops quietly at the first entry that runs past the payload.
pub(super) fn parse_markers(data: &[u8]) -> TimelineMarkers {
    let mut markers = TimelineMarkers::default();
    let Some(count) = read_u16(data, 0, Endianness::Big) else {
        return markers;
    };

    let mut offset = 2usize;
    for _ in 0..count {
        let Some(position) = read_u32(data, offset + 2, Endianness::Big) else {
            break;
        };
        let Some(&name_len) = data.get(offset + 6) else {
            break;
        };
        let name_len = usize::from(name_len);
        let Some(name_bytes) = data.get(offset + 7..offset + 7 + name_len) else {
            break;
        };
        let name = String::from_utf8_lossy(name_bytes);

        // Length byte + name must occupy an even number of bytes.
        let pad = usize::from(name_len % 2 == 0);
        offset += 7 + name_len + pad;

        if let Some(value) = name.strip_prefix(TIMESTAMP_MARKER_PREFIX) {
            if let Ok(ts) = value.trim().parse::<i64>() {
                markers.timestamp = Some(ts);
            }
        } else if name.trim() == START_MARKER {
            markers.start_offset = position;
        }
    }
    markers
}
