use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{info, warn};
use serde::Serialize;
use tempfile::NamedTempFile;

use nestmap_core::models::Interval;
use nestmap_nclist::{Entry, NCList, Overlapper};

use crate::config::BuildOptions;
use crate::error::{Result, StoreError};
use crate::format::{
    FLAG_END_INFERRED, FLAG_LENGTH_KNOWN, FLAG_PAYLOAD, HEADER_LEN, Header, NO_PAYLOAD, RECORD_LEN, Record, VERSION,
};
use crate::reader::IntervalStore;

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub path: PathBuf,
    pub seq_id: String,
    /// Intervals written to the store
    pub intervals: usize,
    /// Malformed intervals dropped in lenient mode
    pub skipped: usize,
    pub roots: usize,
    /// The declared sequence length
    pub sequence_length: Option<u64>,
    /// Largest forward end, recorded when no length was declared and inference is on
    pub inferred_end: Option<u64>,
}

///
/// Collects the intervals of one sequence and writes them out as an interval store.
///
/// Intervals may arrive in any order and orientation. Nothing is validated until
/// [`IntervalStoreBuilder::build`], which checks every interval against the sequence id and
/// length, lays them out as a nested containment list and publishes the file atomically.
///
pub struct IntervalStoreBuilder<P: Serialize> {
    seq_id: String,
    sequence_length: Option<u64>,
    options: BuildOptions,
    pending: Vec<(Interval, Option<P>)>,
}

impl<P: Serialize> IntervalStoreBuilder<P> {
    pub fn new<S: Into<String>>(seq_id: S) -> Self {
        IntervalStoreBuilder {
            seq_id: seq_id.into(),
            sequence_length: None,
            options: BuildOptions::default(),
            pending: Vec::new(),
        }
    }

    pub fn with_sequence_length(mut self, length: u64) -> Self {
        self.sequence_length = Some(length);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn seq_id(&self) -> &str {
        &self.seq_id
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, interval: Interval, payload: Option<P>) {
        self.pending.push((interval, payload));
    }

    /// Largest forward end when no length is declared. Only a lower bound on the length, so
    /// it never stands in for one.
    fn inferred_end(&self) -> Option<u64> {
        if self.sequence_length.is_some() || !self.options.infer_lengths {
            return None;
        }
        self.pending
            .iter()
            .filter(|(iv, _)| iv.seq_id == self.seq_id && iv.orientation.is_forward())
            .map(|(iv, _)| iv.end)
            .max()
    }

    ///
    /// Write the store to `path`.
    ///
    /// The file is assembled in a temporary file next to `path` and only renamed over it once
    /// fully written, so a failed build never leaves a partial store behind.
    ///
    /// # Arguments
    /// - path: where the finished store should live
    pub fn build<T: AsRef<Path>>(self, path: T) -> Result<BuildReport> {
        let path = path.as_ref();
        let inferred_end = self.inferred_end();
        let IntervalStoreBuilder {
            seq_id,
            sequence_length: length,
            options,
            pending,
        } = self;

        let mut skipped = 0;
        let mut entries: Vec<Entry<u64, usize>> = Vec::with_capacity(pending.len());
        let mut kept: Vec<(i8, Option<P>)> = Vec::with_capacity(pending.len());

        for (interval, payload) in pending {
            match forward_bounds(&seq_id, &interval, length) {
                Ok((start, end)) => {
                    entries.push(Entry {
                        start,
                        end,
                        val: kept.len(),
                    });
                    kept.push((interval.orientation.as_i8(), payload));
                }
                Err(message) if options.lenient => {
                    warn!("Skipping interval: {}", message);
                    skipped += 1;
                }
                Err(message) => return Err(StoreError::BuildError(message)),
            }
        }

        let list = NCList::build(entries);
        write_store(path, &seq_id, length, inferred_end, &list, &kept)?;

        let report = BuildReport {
            path: path.to_path_buf(),
            seq_id,
            intervals: list.len(),
            skipped,
            roots: list.root_len(),
            sequence_length: length,
            inferred_end,
        };
        info!(
            "Wrote {} intervals ({} roots, {} skipped) for {} to {}",
            report.intervals,
            report.roots,
            report.skipped,
            report.seq_id,
            path.display()
        );

        Ok(report)
    }

    /// Build, then open the freshly written store.
    pub fn build_and_open<T: AsRef<Path>>(self, path: T) -> Result<(IntervalStore, BuildReport)> {
        let report = self.build(path)?;
        let store = IntervalStore::open(&report.path)?;
        Ok((store, report))
    }
}

/// Forward coordinates for one interval, or why it can't be stored.
fn forward_bounds(
    seq_id: &str,
    interval: &Interval,
    length: Option<u64>,
) -> std::result::Result<(u64, u64), String> {
    if interval.seq_id != seq_id {
        return Err(format!("{} does not belong to {}", interval, seq_id));
    }
    if interval.start > interval.end {
        return Err(format!("{} starts after it ends", interval));
    }
    match length {
        Some(len) => {
            let fwd = interval
                .to_forward(len)
                .map_err(|e| format!("{}: {}", interval, e))?;
            Ok((fwd.start, fwd.end))
        }
        None if interval.orientation.is_forward() => Ok((interval.start, interval.end)),
        None => Err(format!(
            "{} is reverse but the length of {} is unknown",
            interval, seq_id
        )),
    }
}

fn write_store<P: Serialize>(
    path: &Path,
    seq_id: &str,
    length: Option<u64>,
    inferred_end: Option<u64>,
    list: &NCList<u64, usize>,
    kept: &[(i8, Option<P>)],
) -> Result<()> {
    // payload blobs in layout order; record offsets are relative to the payload section
    let mut payload_section: Vec<u8> = Vec::new();
    let mut records: Vec<Record> = Vec::with_capacity(list.len());
    for (pos, entry) in list.iter().enumerate() {
        let (orientation, payload) = &kept[entry.val];
        let payload_offset = match payload {
            Some(p) => {
                let blob = bincode::serialize(p)?;
                let blob_len = u32::try_from(blob.len()).map_err(|_| {
                    StoreError::BuildError(format!("payload of {} bytes is too large", blob.len()))
                })?;
                let offset = payload_section.len() as u64;
                payload_section.write_u32::<LittleEndian>(blob_len)?;
                payload_section.extend_from_slice(&blob);
                offset
            }
            None => NO_PAYLOAD,
        };
        let children = list.child_list(pos);
        records.push(Record {
            start: entry.start,
            end: entry.end,
            orientation: *orientation,
            child_count: u32::try_from(children.len).map_err(|_| {
                StoreError::BuildError(format!("{} children under one interval", children.len))
            })?,
            child_start: children.start as u64,
            payload_offset,
        });
    }

    let records_offset = (HEADER_LEN + 4 + seq_id.len()) as u64;
    let payload_offset = records_offset + (records.len() * RECORD_LEN) as u64;
    let mut flags = 0;
    if !payload_section.is_empty() {
        flags |= FLAG_PAYLOAD;
    }
    if length.is_some() {
        flags |= FLAG_LENGTH_KNOWN;
    } else if inferred_end.is_some() {
        flags |= FLAG_END_INFERRED;
    }
    let header = Header {
        version: VERSION,
        flags,
        interval_count: records.len() as u64,
        root_count: list.root_len() as u64,
        sequence_length: length.or(inferred_end).unwrap_or(0),
        records_offset,
        payload_offset,
        payload_len: payload_section.len() as u64,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        header.write(&mut writer)?;
        writer.write_u32::<LittleEndian>(seq_id.len() as u32)?;
        writer.write_all(seq_id.as_bytes())?;
        for record in &records {
            record.write(&mut writer)?;
        }
        writer.write_all(&payload_section)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}
