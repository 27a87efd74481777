//! IFF-style chunk walking shared by the RIFF/WAVE and FORM/AIFF readers.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use super::HeaderError;

/// Byte order of the size fields (and payload integers) of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endianness {
    Little,
    Big,
}

/// One chunk header found while walking a container.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
    pub payload_start: u64,
}

/// Forward-only walker over the chunks of a RIFF or FORM container.
///
/// Odd-sized chunks are normally followed by a zero pad byte. Some writers
/// omit it, so the pad is only consumed when the byte at the pad position is
/// literally zero; chunk ids are printable ASCII and never start with zero.
pub(crate) struct ChunkWalker<R> {
    reader: R,
    endianness: Endianness,
    pos: u64,
    end: u64,
}

impl<R: Read + Seek> ChunkWalker<R> {
    /// Validate the 12-byte container header and return the walker together
    /// with the form type (`WAVE`, `AIFF`, `AIFC`, ...).
    pub fn open(
        mut reader: R,
        magic: &[u8; 4],
        endianness: Endianness,
    ) -> Result<(Self, [u8; 4]), HeaderError> {
        let mut head = [0u8; 12];
        reader.seek(SeekFrom::Start(0))?;
        reader.read_exact(&mut head)?;

        let id = fourcc_at(&head, 0).ok_or(HeaderError::Truncated)?;
        if &id != magic {
            return Err(HeaderError::BadMagic { found: id });
        }
        let size = read_u32(&head, 4, endianness).ok_or(HeaderError::Truncated)?;
        let form = fourcc_at(&head, 8).ok_or(HeaderError::Truncated)?;

        Ok((
            Self {
                reader,
                endianness,
                pos: 12,
                end: u64::from(size) + 8,
            },
            form,
        ))
    }

    /// Advance to the next chunk. Returns `None` at the declared container end
    /// or when the file ends before a full chunk header.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkHeader>, HeaderError> {
        if self.pos + 8 > self.end {
            return Ok(None);
        }
        self.reader.seek(SeekFrom::Start(self.pos))?;
        let mut head = [0u8; 8];
        match self.reader.read_exact(&mut head) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let id = fourcc_at(&head, 0).ok_or(HeaderError::Truncated)?;
        let size = read_u32(&head, 4, self.endianness).ok_or(HeaderError::Truncated)?;
        let payload_start = self.pos + 8;

        let mut next = payload_start + u64::from(size);
        if size % 2 == 1 && self.pad_byte_at(next)? {
            next += 1;
        }
        self.pos = next;

        Ok(Some(ChunkHeader {
            id,
            size,
            payload_start,
        }))
    }

    /// Read a chunk's full payload. Chunks larger than `limit` are refused so a
    /// corrupt size field cannot trigger a huge allocation.
    pub fn read_payload(&mut self, chunk: &ChunkHeader, limit: u32) -> Result<Vec<u8>, HeaderError> {
        if chunk.size > limit {
            return Err(HeaderError::ChunkTooLarge {
                id: chunk.id,
                size: chunk.size,
            });
        }
        self.reader.seek(SeekFrom::Start(chunk.payload_start))?;
        let mut payload = vec![0u8; chunk.size as usize];
        self.reader.read_exact(&mut payload)?;
        Ok(payload)
    }

    fn pad_byte_at(&mut self, offset: u64) -> Result<bool, HeaderError> {
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut byte = [0u8; 1];
        match self.reader.read_exact(&mut byte) {
            Ok(()) => Ok(byte == [0]),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Byte helpers ────────────────────────────────────────────────────

pub(crate) fn fourcc_at(bytes: &[u8], at: usize) -> Option<[u8; 4]> {
    bytes.get(at..at + 4)?.try_into().ok()
}

pub(crate) fn read_u16(bytes: &[u8], at: usize, endianness: Endianness) -> Option<u16> {
    let raw: [u8; 2] = bytes.get(at..at + 2)?.try_into().ok()?;
    Some(match endianness {
        Endianness::Little => u16::from_le_bytes(raw),
        Endianness::Big => u16::from_be_bytes(raw),
    })
}

pub(crate) fn read_u32(bytes: &[u8], at: usize, endianness: Endianness) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(match endianness {
        Endianness::Little => u32::from_le_bytes(raw),
        Endianness::Big => u32::from_be_bytes(raw),
    })
}

pub(crate) fn read_u64(bytes: &[u8], at: usize, endianness: Endianness) -> Option<u64> {
    let raw: [u8; 8] = bytes.get(at..at + 8)?.try_into().ok()?;
    Some(match endianness {
        Endianness::Little => u64::from_le_bytes(raw),
        Endianness::Big => u64::from_be_bytes(raw),
    })
}
