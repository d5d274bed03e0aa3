use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use serde::de::DeserializeOwned;

use nestmap_core::CoordError;
use nestmap_core::models::{Interval, Orientation};
use nestmap_nclist::{ContainmentLayout, OverlapWalk, Sublist};

use crate::error::{Result, StoreError};
use crate::format::{HEADER_LEN, Header, HeaderProblem, RECORD_LEN, Record};

/// One stored interval as returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreHit {
    /// The interval in its own oriented frame
    pub interval: Interval,
    /// Position of the record in the layout
    pub position: usize,
    payload_offset: Option<u64>,
}

impl StoreHit {
    pub fn has_payload(&self) -> bool {
        self.payload_offset.is_some()
    }
}

///
/// A read-only, memory-mapped interval store for one sequence.
///
/// Opening a store validates the header and every record pointer, after which queries walk
/// the mapped records directly. The store is `Send + Sync` and is queried through `&self`.
///
#[derive(Debug)]
pub struct IntervalStore {
    path: PathBuf,
    mmap: Mmap,
    header: Header,
    seq_id: String,
}

impl IntervalStore {
    ///
    /// Open the store at `path`.
    ///
    /// # Arguments
    /// - path: path to a file written by [`crate::IntervalStoreBuilder`]
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let corrupt = |message: String| StoreError::CorruptFormat {
            path: path.to_path_buf(),
            message,
        };

        let file_len = file.metadata()?.len();
        if file_len < (HEADER_LEN + 4) as u64 {
            return Err(corrupt(format!("file is only {} bytes long", file_len)));
        }

        // SAFETY: stores are never modified after they are published; rebuilds replace the
        // file by renaming, so the mapped inode stays intact.
        let mmap = unsafe { Mmap::map(&file) }?;

        let header = match Header::read(&mut Cursor::new(&mmap[..HEADER_LEN]))? {
            Ok(header) => header,
            Err(HeaderProblem::BadMagic) => return Err(corrupt("bad magic bytes".to_string())),
            Err(HeaderProblem::UnsupportedVersion(v)) => {
                return Err(corrupt(format!("unsupported version {}", v)));
            }
        };

        let id_len = LittleEndian::read_u32(&mmap[HEADER_LEN..HEADER_LEN + 4]) as usize;
        let id_end = HEADER_LEN + 4 + id_len;
        if id_end > mmap.len() {
            return Err(corrupt("truncated sequence id".to_string()));
        }
        let seq_id = std::str::from_utf8(&mmap[HEADER_LEN + 4..id_end])
            .map_err(|e| corrupt(format!("sequence id is not UTF-8: {}", e)))?
            .to_string();

        let records_len = header
            .interval_count
            .checked_mul(RECORD_LEN as u64)
            .ok_or_else(|| corrupt("interval count overflows".to_string()))?;
        let sections_fit = header.records_offset == id_end as u64
            && header.records_offset.checked_add(records_len) == Some(header.payload_offset)
            && header.payload_offset.checked_add(header.payload_len) == Some(mmap.len() as u64);
        if !sections_fit {
            return Err(corrupt("section offsets do not match the file size".to_string()));
        }
        if header.root_count > header.interval_count {
            return Err(corrupt("more roots than intervals".to_string()));
        }

        let store = IntervalStore {
            path: path.to_path_buf(),
            mmap,
            header,
            seq_id,
        };
        store.validate_records().map_err(corrupt)?;
        Ok(store)
    }

    fn validate_records(&self) -> std::result::Result<(), String> {
        let count = self.header.interval_count;
        for pos in 0..self.len() {
            let record = self.record(pos);
            if record.start > record.end {
                return Err(format!("record {} starts after it ends", pos));
            }
            let bound = self.sequence_length().or(self.inferred_end());
            if bound.is_some_and(|len| record.end > len) {
                return Err(format!("record {} ends past the sequence length", pos));
            }
            match Orientation::from_i8(record.orientation) {
                None => {
                    return Err(format!("record {} has orientation {}", pos, record.orientation));
                }
                // reverse records can only be read back through a known length
                Some(Orientation::Reverse) if self.sequence_length().is_none() => {
                    return Err(format!("record {} is reverse but the length is unknown", pos));
                }
                Some(_) => {}
            }
            if record.child_count > 0 {
                // children always follow their parent, which also rules out cycles
                let past_end = record
                    .child_start
                    .checked_add(record.child_count as u64)
                    .is_none_or(|end| end > count);
                if past_end || record.child_start <= pos as u64 {
                    return Err(format!("record {} has bad child pointers", pos));
                }
            }
            if record.has_payload()
                && record
                    .payload_offset
                    .checked_add(4)
                    .is_none_or(|end| end > self.header.payload_len)
            {
                return Err(format!("record {} points at a payload past the end", pos));
            }
        }
        Ok(())
    }

    #[inline]
    fn record_bytes(&self, pos: usize) -> &[u8] {
        let offset = self.header.records_offset as usize + pos * RECORD_LEN;
        &self.mmap[offset..offset + RECORD_LEN]
    }

    #[inline]
    fn record(&self, pos: usize) -> Record {
        Record::decode(self.record_bytes(pos))
    }

    fn hit(&self, pos: usize) -> StoreHit {
        let record = self.record(pos);
        let orientation = Orientation::from_i8(record.orientation).unwrap_or_default();
        let (start, end) = match (orientation, self.sequence_length()) {
            (Orientation::Reverse, Some(len)) => (len - record.end, len - record.start),
            _ => (record.start, record.end),
        };
        StoreHit {
            interval: Interval {
                seq_id: self.seq_id.clone(),
                start,
                end,
                orientation,
            },
            position: pos,
            payload_offset: record.has_payload().then_some(record.payload_offset),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn seq_id(&self) -> &str {
        &self.seq_id
    }

    /// The sequence length recorded at build time, if it was known.
    pub fn sequence_length(&self) -> Option<u64> {
        self.header.sequence_length()
    }

    /// Largest forward end seen at build time, for stores built without a declared length.
    pub fn inferred_end(&self) -> Option<u64> {
        self.header.inferred_end()
    }

    pub fn len(&self) -> usize {
        self.header.interval_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.interval_count == 0
    }

    pub fn root_len(&self) -> usize {
        self.header.root_count as usize
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Every stored interval overlapping the forward range [start, end), in pre-order.
    pub fn overlap(&self, start: u64, end: u64) -> Vec<StoreHit> {
        self.overlap_iter(start, end).collect()
    }

    pub fn overlap_iter(&self, start: u64, end: u64) -> StoreIter<'_> {
        StoreIter {
            store: self,
            walk: OverlapWalk::new(self, start, end),
        }
    }

    ///
    /// Overlap query with an oriented interval.
    ///
    /// The query is flipped onto the forward strand when needed, and every hit is handed back
    /// on the query's strand, so a reverse query sees reverse coordinates.
    ///
    pub fn overlap_interval(&self, query: &Interval) -> Result<Vec<StoreHit>> {
        if query.seq_id != self.seq_id {
            return Err(CoordError::SequenceMismatch(query.seq_id.clone(), self.seq_id.clone()).into());
        }
        let Some(len) = self.sequence_length() else {
            if query.orientation.is_forward() {
                return Ok(self.overlap(query.start, query.end));
            }
            return Err(StoreError::UnknownLength(self.seq_id.clone()));
        };
        let fwd = query.to_forward(len)?;
        self.overlap_iter(fwd.start, fwd.end)
            .map(|mut hit| {
                hit.interval = hit.interval.in_orientation(query.orientation, len)?;
                Ok(hit)
            })
            .collect()
    }

    /// Overlap query that decodes each hit's payload.
    pub fn overlap_with_payload<P: DeserializeOwned>(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<(StoreHit, Option<P>)>> {
        self.overlap_iter(start, end)
            .map(|hit| {
                let payload = self.payload(&hit)?;
                Ok((hit, payload))
            })
            .collect()
    }

    /// All stored intervals in layout order.
    pub fn iter(&self) -> impl Iterator<Item = StoreHit> + '_ {
        (0..self.len()).map(|pos| self.hit(pos))
    }

    /// Decode the payload attached to a hit.
    pub fn payload<P: DeserializeOwned>(&self, hit: &StoreHit) -> Result<Option<P>> {
        let Some(offset) = hit.payload_offset else {
            return Ok(None);
        };
        let start = (self.header.payload_offset + offset) as usize;
        let blob_len = LittleEndian::read_u32(&self.mmap[start..start + 4]) as usize;
        let end = start + 4 + blob_len;
        if end > self.mmap.len() {
            return Err(StoreError::CorruptFormat {
                path: self.path.clone(),
                message: format!("payload at {} runs past the end of the file", offset),
            });
        }
        Ok(Some(bincode::deserialize(&self.mmap[start + 4..end])?))
    }
}

impl ContainmentLayout for IntervalStore {
    type Coord = u64;

    #[inline]
    fn root(&self) -> Sublist {
        Sublist {
            start: 0,
            len: self.root_len(),
        }
    }

    #[inline]
    fn bounds(&self, pos: usize) -> (u64, u64) {
        Record::decode_bounds(self.record_bytes(pos))
    }

    #[inline]
    fn children(&self, pos: usize) -> Sublist {
        let record = self.record(pos);
        Sublist {
            start: record.child_start as usize,
            len: record.child_count as usize,
        }
    }
}

/// Iterator over the hits of an [`IntervalStore`] overlap query.
pub struct StoreIter<'a> {
    store: &'a IntervalStore,
    walk: OverlapWalk<'a, IntervalStore>,
}

impl Iterator for StoreIter<'_> {
    type Item = StoreHit;

    fn next(&mut self) -> Option<StoreHit> {
        self.walk.next().map(|pos| self.store.hit(pos))
    }
}
