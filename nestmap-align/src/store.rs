use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use fxhash::FxHashMap as HashMap;
use log::debug;

use nestmap_core::models::{AlignedPair, AlignmentEdge, Interval, SeqView};
use nestmap_io::EdgeDumpWriter;
use nestmap_store::{BuildOptions, IntervalStore, StoreError};

use crate::builder::{AlignmentStoreBuilder, SealReport};
use crate::error::{AlignError, Result};
use crate::manifest::{MANIFEST_FILE, Manifest};

///
/// A sealed alignment store: one interval store per source sequence plus the manifest that
/// ties them together.
///
/// Interval stores are opened on first use and then shared, so a store can be queried from
/// many threads through `&self`.
///
#[derive(Debug)]
pub struct AlignmentStore {
    dir: PathBuf,
    manifest: Manifest,
    stores: HashMap<String, OnceLock<Arc<IntervalStore>>>,
}

impl AlignmentStore {
    ///
    /// Build and seal an alignment store from `(src, dst)` edges.
    ///
    /// # Arguments
    /// - edges: the edges, each side in its own oriented frame
    /// - dir: the store directory
    pub fn build<I, P>(edges: I, dir: P) -> Result<PathBuf>
    where
        I: IntoIterator<Item = (Interval, Interval)>,
        P: AsRef<Path>,
    {
        let mut builder = AlignmentStoreBuilder::new();
        for (src, dst) in edges {
            builder.add_edge(src, dst)?;
        }
        Ok(builder.seal(dir)?.dir)
    }

    /// Build and seal an alignment store from a text edge dump.
    pub fn build_from_dump<P: AsRef<Path>, Q: AsRef<Path>>(
        dump: P,
        dir: Q,
        options: BuildOptions,
    ) -> Result<SealReport> {
        let mut builder = AlignmentStoreBuilder::new().with_options(options);
        builder.add_dump(dump)?;
        builder.seal(dir)
    }

    /// Open a sealed store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(AlignError::NotFound(format!(
                "no alignment store manifest in {}",
                dir.display()
            )));
        }
        let manifest = Manifest::try_from(manifest_path.as_path())?;
        let stores = manifest
            .sequences
            .iter()
            .filter(|(_, entry)| entry.file.is_some())
            .map(|(seq_id, _)| (seq_id.clone(), OnceLock::new()))
            .collect();
        debug!(
            "Opened alignment store {} with {} sequences",
            dir.display(),
            manifest.sequences.len()
        );

        Ok(AlignmentStore {
            dir: dir.to_path_buf(),
            manifest,
            stores,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Source sequences, the ones with edges out of them, in sorted order.
    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        self.manifest
            .sequences
            .iter()
            .filter(|(_, entry)| entry.file.is_some())
            .map(|(seq_id, _)| seq_id.as_str())
    }

    pub fn sequence_length(&self, seq_id: &str) -> Option<u64> {
        self.manifest.length(seq_id)
    }

    pub fn edge_count(&self) -> u64 {
        self.manifest.edge_count()
    }

    /// The interval store for one source sequence, opened on first use.
    ///
    /// `Ok(None)` means the sequence is known but only ever appears as a destination.
    pub fn interval_store(&self, seq_id: &str) -> Result<Option<Arc<IntervalStore>>> {
        let entry = self
            .manifest
            .sequence(seq_id)
            .ok_or_else(|| AlignError::NotFound(format!("sequence {}", seq_id)))?;
        let (Some(file), Some(cell)) = (&entry.file, self.stores.get(seq_id)) else {
            return Ok(None);
        };
        if let Some(store) = cell.get() {
            return Ok(Some(Arc::clone(store)));
        }

        let store = Arc::new(IntervalStore::open(self.dir.join(file))?);
        if store.seq_id() != seq_id {
            return Err(StoreError::CorruptFormat {
                path: store.path().to_path_buf(),
                message: format!("holds {} instead of {}", store.seq_id(), seq_id),
            }
            .into());
        }
        // another thread may have won the race; either handle maps the same file
        Ok(Some(Arc::clone(cell.get_or_init(|| store))))
    }

    ///
    /// Everything aligned to the forward range `[start, end)` of a source sequence.
    ///
    /// Each edge overlapping the range is clipped to it and the clipped piece is interpolated
    /// onto the destination, in the destination's own oriented frame.
    ///
    /// # Arguments
    /// - seq_id: the source sequence
    /// - start: start of the range
    /// - end: end of the range
    pub fn aligned_to(&self, seq_id: &str, start: u64, end: u64) -> Result<Vec<AlignedPair>> {
        let Some(store) = self.interval_store(seq_id)? else {
            return Ok(Vec::new());
        };

        let mut pairs = Vec::new();
        for (hit, dst) in store.overlap_with_payload::<Interval>(start, end)? {
            let Some(dst) = dst else {
                return Err(StoreError::CorruptFormat {
                    path: store.path().to_path_buf(),
                    message: format!("edge {} has no destination", hit.interval),
                }
                .into());
            };
            let edge = AlignmentEdge::new(hit.interval, dst)?;
            pairs.extend(edge.interpolate(start, end));
        }
        Ok(pairs)
    }

    ///
    /// Like [`AlignmentStore::aligned_to`], for an oriented query.
    ///
    /// A reverse query is answered on the forward strand, and each pair is then read from the
    /// other strand of both sequences, so both lengths must be in the manifest.
    pub fn aligned_to_interval(&self, query: &Interval) -> Result<Vec<AlignedPair>> {
        if query.orientation.is_forward() {
            return self.aligned_to(&query.seq_id, query.start, query.end);
        }
        let src_len = self.require_length(&query.seq_id)?;
        let fwd = query.to_forward(src_len)?;
        self.aligned_to(&fwd.seq_id, fwd.start, fwd.end)?
            .into_iter()
            .map(|pair| -> Result<AlignedPair> {
                let dst_len = self.require_length(&pair.dst.seq_id)?;
                Ok(pair.reverse_complement(src_len, dst_len)?)
            })
            .collect()
    }

    /// Everything aligned to the region a sequence view covers.
    pub fn aligned_to_view(&self, view: &SeqView) -> Result<Vec<AlignedPair>> {
        self.aligned_to_interval(view.interval())
    }

    fn require_length(&self, seq_id: &str) -> Result<u64> {
        self.sequence_length(seq_id)
            .ok_or_else(|| AlignError::NotFound(format!("length of sequence {}", seq_id)))
    }

    ///
    /// Write the whole store back out as a text edge dump, returning the number of edges.
    ///
    /// Length directives come first, then every edge in canonical form.
    pub fn dump<W: Write>(&self, writer: W) -> Result<usize> {
        let mut writer = EdgeDumpWriter::new(writer)?;
        self.write_dump(&mut writer)?;
        let count = writer.edge_count();
        writer.finish()?;
        Ok(count)
    }

    /// Like [`AlignmentStore::dump`], into a file that is gzip'd when its name ends in `.gz`.
    pub fn dump_to_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let mut writer = EdgeDumpWriter::create(path)?;
        self.write_dump(&mut writer)?;
        Ok(writer.close()?)
    }

    fn write_dump<W: Write>(&self, writer: &mut EdgeDumpWriter<W>) -> Result<()> {
        for (seq_id, entry) in &self.manifest.sequences {
            if let Some(length) = entry.length {
                writer.write_length(seq_id, length)?;
            }
        }
        for seq_id in self.sequences() {
            let Some(store) = self.interval_store(seq_id)? else {
                continue;
            };
            for hit in store.iter() {
                if let Some(dst) = store.payload::<Interval>(&hit)? {
                    writer.write_edge(&hit.interval, &dst)?;
                }
            }
        }
        Ok(())
    }
}
