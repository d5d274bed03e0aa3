//! Byte layout of an interval store file.
//!
//! ```text
//! header            64 bytes
//! sequence id       u32 length + UTF-8 bytes
//! records           interval_count x 37 bytes, in containment layout order
//! payload           u32 length prefixed bincode blobs
//! ```
//!
//! Every integer is little endian.
use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

/// Magic bytes for the store format
pub const MAGIC: &[u8; 8] = b"NESTMAP\0";

/// Current binary format version
pub const VERSION: u32 = 1;

pub const HEADER_LEN: usize = 64;

pub const RECORD_LEN: usize = 37;

/// Record payload offset meaning "no payload"
pub const NO_PAYLOAD: u64 = u64::MAX;

/// The payload section is present
pub const FLAG_PAYLOAD: u32 = 1;

/// `sequence_length` holds a real length rather than a placeholder
pub const FLAG_LENGTH_KNOWN: u32 = 1 << 1;

/// `sequence_length` holds the largest forward end seen at build time, not a length
pub const FLAG_END_INFERRED: u32 = 1 << 2;

/// Fixed size header at the start of every store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub flags: u32,
    pub interval_count: u64,
    pub root_count: u64,
    pub sequence_length: u64,
    pub records_offset: u64,
    pub payload_offset: u64,
    pub payload_len: u64,
}

/// What went wrong while decoding a header.
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderProblem {
    BadMagic,
    UnsupportedVersion(u32),
}

impl Header {
    pub fn has_payload(&self) -> bool {
        self.flags & FLAG_PAYLOAD != 0
    }

    pub fn sequence_length(&self) -> Option<u64> {
        (self.flags & FLAG_LENGTH_KNOWN != 0).then_some(self.sequence_length)
    }

    pub fn inferred_end(&self) -> Option<u64> {
        (self.flags & FLAG_LENGTH_KNOWN == 0 && self.flags & FLAG_END_INFERRED != 0)
            .then_some(self.sequence_length)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u32::<LittleEndian>(self.flags)?;
        writer.write_u64::<LittleEndian>(self.interval_count)?;
        writer.write_u64::<LittleEndian>(self.root_count)?;
        writer.write_u64::<LittleEndian>(self.sequence_length)?;
        writer.write_u64::<LittleEndian>(self.records_offset)?;
        writer.write_u64::<LittleEndian>(self.payload_offset)?;
        writer.write_u64::<LittleEndian>(self.payload_len)?;
        Ok(())
    }

    /// Decode a header from the first [`HEADER_LEN`] bytes of a file.
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<std::result::Result<Self, HeaderProblem>> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Ok(Err(HeaderProblem::BadMagic));
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Ok(Err(HeaderProblem::UnsupportedVersion(version)));
        }

        Ok(Ok(Header {
            version,
            flags: reader.read_u32::<LittleEndian>()?,
            interval_count: reader.read_u64::<LittleEndian>()?,
            root_count: reader.read_u64::<LittleEndian>()?,
            sequence_length: reader.read_u64::<LittleEndian>()?,
            records_offset: reader.read_u64::<LittleEndian>()?,
            payload_offset: reader.read_u64::<LittleEndian>()?,
            payload_len: reader.read_u64::<LittleEndian>()?,
        }))
    }
}

/// One node of the flattened containment list, in forward coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub start: u64,
    pub end: u64,
    pub orientation: i8,
    pub child_count: u32,
    pub child_start: u64,
    pub payload_offset: u64,
}

impl Record {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.start)?;
        writer.write_u64::<LittleEndian>(self.end)?;
        writer.write_i8(self.orientation)?;
        writer.write_u32::<LittleEndian>(self.child_count)?;
        writer.write_u64::<LittleEndian>(self.child_start)?;
        writer.write_u64::<LittleEndian>(self.payload_offset)?;
        Ok(())
    }

    /// Decode a record from exactly [`RECORD_LEN`] bytes.
    #[inline]
    pub fn decode(buf: &[u8]) -> Record {
        Record {
            start: LittleEndian::read_u64(&buf[0..8]),
            end: LittleEndian::read_u64(&buf[8..16]),
            orientation: buf[16] as i8,
            child_count: LittleEndian::read_u32(&buf[17..21]),
            child_start: LittleEndian::read_u64(&buf[21..29]),
            payload_offset: LittleEndian::read_u64(&buf[29..37]),
        }
    }

    /// Start and end only, for the hot path of a query.
    #[inline]
    pub fn decode_bounds(buf: &[u8]) -> (u64, u64) {
        (
            LittleEndian::read_u64(&buf[0..8]),
            LittleEndian::read_u64(&buf[8..16]),
        )
    }

    pub fn has_payload(&self) -> bool {
        self.payload_offset != NO_PAYLOAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn header() -> Header {
        Header {
            version: VERSION,
            flags: FLAG_PAYLOAD | FLAG_LENGTH_KNOWN,
            interval_count: 3,
            root_count: 2,
            sequence_length: 1000,
            records_offset: 70,
            payload_offset: 181,
            payload_len: 12,
        }
    }

    #[rstest]
    fn test_header_is_fixed_size() {
        let mut buf = Vec::new();
        header().write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        let decoded = Header::read(&mut Cursor::new(buf)).unwrap().unwrap();
        assert_eq!(decoded, header());
        assert_eq!(decoded.sequence_length(), Some(1000));
        assert_eq!(decoded.inferred_end(), None);
    }

    #[rstest]
    fn test_inferred_end_is_not_a_length() {
        let header = Header {
            flags: FLAG_END_INFERRED,
            ..header()
        };
        assert_eq!(header.sequence_length(), None);
        assert_eq!(header.inferred_end(), Some(1000));
    }

    #[rstest]
    fn test_header_bad_magic() {
        let mut buf = Vec::new();
        header().write(&mut buf).unwrap();
        buf[0] = b'X';
        let decoded = Header::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, Err(HeaderProblem::BadMagic));
    }

    #[rstest]
    fn test_header_bad_version() {
        let mut buf = Vec::new();
        Header {
            version: 7,
            ..header()
        }
        .write(&mut buf)
        .unwrap();
        let decoded = Header::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, Err(HeaderProblem::UnsupportedVersion(7)));
    }

    #[rstest]
    fn test_record_is_fixed_size() {
        let record = Record {
            start: 5,
            end: 50,
            orientation: -1,
            child_count: 2,
            child_start: 9,
            payload_offset: NO_PAYLOAD,
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(buf.len(), RECORD_LEN);
        assert_eq!(Record::decode(&buf), record);
        assert_eq!(Record::decode_bounds(&buf), (5, 50));
        assert!(!record.has_payload());
    }
}
