use std::io::{Read, Seek};

use super::chunk::{read_u16, read_u32, read_u64, ChunkWalker, Endianness};
use super::{AudioHeader, HeaderError, MAX_METADATA_CHUNK};

/// Minimum `bext` payload that still carries the 64-bit time reference.
const BEXT_MIN_LEN: u32 = 346;
/// Offset of `TimeReferenceLow`/`High` inside the `bext` payload.
const BEXT_TIME_REFERENCE_OFFSET: usize = 338;

/// Read frame count, sample rate and the BWF time reference of a RIFF/WAVE file.
pub(super) fn read_wav<R: Read + Seek>(reader: R) -> Result<AudioHeader, HeaderError> {
    let (mut walker, form) = ChunkWalker::open(reader, b"RIFF", Endianness::Little)?;
    if &form != b"WAVE" {
        return Err(HeaderError::BadMagic { found: form });
    }

    let mut sample_rate = None;
    let mut block_align = 0u16;
    let mut data_size = None;
    let mut time_reference = None;

    while let Some(chunk) = walker.next_chunk()? {
        match &chunk.id {
            b"fmt " => {
                let fmt = walker.read_payload(&chunk, MAX_METADATA_CHUNK)?;
                sample_rate = read_u32(&fmt, 4, Endianness::Little);
                block_align = read_u16(&fmt, 12, Endianness::Little).unwrap_or(0);
            }
            b"data" => data_size = Some(chunk.size),
            b"bext" if chunk.size >= BEXT_MIN_LEN => {
                let bext = walker.read_payload(&chunk, MAX_METADATA_CHUNK)?;
                time_reference = read_u64(&bext, BEXT_TIME_REFERENCE_OFFSET, Endianness::Little);
            }
            _ => {}
        }
    }

    let sample_rate = sample_rate
        .filter(|&rate| rate > 0)
        .ok_or(HeaderError::MissingChunk("fmt "))?;
    let data_size = data_size.ok_or(HeaderError::MissingChunk("data"))?;
    let frame_count = if block_align == 0 {
        0
    } else {
        u64::from(data_size) / u64::from(block_align)
    };

    Ok(AudioHeader {
        frame_count,
        sample_rate,
        timeline_origin: time_reference,
    })
}
