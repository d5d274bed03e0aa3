use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
use log::{debug, info, warn};

use nestmap_core::models::{AlignmentEdge, Interval};
use nestmap_io::{DumpRecord, EdgeDumpError, EdgeDumpReader};
use nestmap_store::consts::STORE_EXT;
use nestmap_store::{BuildOptions, IntervalStoreBuilder, StoreError};

use crate::error::Result;
use crate::manifest::{MANIFEST_FILE, Manifest, SequenceEntry};

/// Summary of a sealed alignment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealReport {
    pub dir: PathBuf,
    /// Source sequences that got an interval store
    pub sequences: usize,
    pub edges: usize,
    /// Malformed records dropped in lenient mode
    pub skipped: usize,
}

///
/// Collects alignment edges and seals them into an alignment store directory.
///
/// Edges are grouped by source sequence as they arrive. Sealing canonicalizes every edge so
/// its source is forward, writes one interval store per source sequence with the destination
/// interval as payload, and finally writes the manifest.
///
#[derive(Debug, Default)]
pub struct AlignmentStoreBuilder {
    options: BuildOptions,
    lengths: HashMap<String, u64>,
    groups: HashMap<String, Vec<AlignmentEdge>>,
    edges: usize,
    skipped: usize,
}

impl AlignmentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Number of edges accepted so far.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Record the length of a sequence. A later declaration replaces an earlier one.
    pub fn declare_length<S: Into<String>>(&mut self, seq_id: S, length: u64) {
        let seq_id = seq_id.into();
        match self.lengths.insert(seq_id.clone(), length) {
            Some(old) if old != length => {
                warn!("Length of {} redeclared: {} -> {}", seq_id, old, length);
            }
            _ => {}
        }
    }

    /// Handle a malformed record: fail in strict mode, count and carry on in lenient mode.
    fn reject(&mut self, message: String) -> Result<()> {
        if self.options.lenient {
            warn!("Skipping edge: {}", message);
            self.skipped += 1;
            Ok(())
        } else {
            Err(StoreError::BuildError(message).into())
        }
    }

    ///
    /// Add one edge. The two sides must have a 1:1, 3:1 or 1:3 length ratio.
    ///
    /// # Arguments
    /// - src: source interval, in its own oriented frame
    /// - dst: the destination interval it aligns to
    pub fn add_edge(&mut self, src: Interval, dst: Interval) -> Result<()> {
        match AlignmentEdge::new(src, dst) {
            Ok(edge) => {
                self.groups
                    .entry(edge.src().seq_id.clone())
                    .or_default()
                    .push(edge);
                self.edges += 1;
                Ok(())
            }
            Err(e) => self.reject(e.to_string()),
        }
    }

    pub fn add_record(&mut self, record: DumpRecord) -> Result<()> {
        match record {
            DumpRecord::Length { seq_id, length } => {
                self.declare_length(seq_id, length);
                Ok(())
            }
            DumpRecord::Edge { src, dst } => self.add_edge(src, dst),
        }
    }

    ///
    /// Take one item from an [`EdgeDumpReader`]. Unparseable lines count as malformed edges;
    /// IO errors always abort.
    pub fn add_parsed(&mut self, parsed: nestmap_io::Result<DumpRecord>) -> Result<()> {
        match parsed {
            Ok(record) => self.add_record(record),
            Err(e @ EdgeDumpError::Parse { .. }) => self.reject(e.to_string()),
            Err(e) => Err(e.into()),
        }
    }

    ///
    /// Feed every record of a text edge dump into the builder.
    ///
    /// # Arguments
    /// - path: path to the dump, gzip'd if it ends in `.gz`
    pub fn add_dump<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        for parsed in EdgeDumpReader::from_path(path)? {
            self.add_parsed(parsed)?;
        }
        Ok(())
    }

    ///
    /// Write the alignment store into `dir`.
    ///
    /// Interval stores go out under file names of a new generation and the manifest is renamed
    /// into place last. Until then the directory still reads as the previous store, if any, and
    /// a failed seal removes whatever it wrote. Store files of generations older than the
    /// previous one are pruned afterwards.
    ///
    /// # Arguments
    /// - dir: the store directory, created if missing
    pub fn seal<P: AsRef<Path>>(mut self, dir: P) -> Result<SealReport> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let previous = previous_manifest(dir);
        let generation = previous.as_ref().map_or(0, |m| m.generation + 1);

        let mut written = Vec::new();
        let (manifest, sequences, edges) =
            match self.write_generation(dir, generation, &mut written) {
                Ok(sealed) => sealed,
                Err(e) => {
                    discard(&written);
                    return Err(e);
                }
            };
        prune(dir, &manifest, previous.as_ref());

        let report = SealReport {
            dir: dir.to_path_buf(),
            sequences,
            edges,
            skipped: self.skipped,
        };
        info!(
            "Sealed alignment store at {} ({} sequences, {} edges, {} skipped)",
            dir.display(),
            report.sequences,
            report.edges,
            report.skipped
        );
        Ok(report)
    }

    /// Write one interval store per source sequence, then the manifest naming them.
    fn write_generation(
        &mut self,
        dir: &Path,
        generation: u64,
        written: &mut Vec<PathBuf>,
    ) -> Result<(Manifest, usize, usize)> {
        let mut manifest = Manifest {
            generation,
            ..Default::default()
        };
        for (seq_id, length) in &self.lengths {
            manifest.sequences.insert(
                seq_id.clone(),
                SequenceEntry {
                    length: Some(*length),
                    ..Default::default()
                },
            );
        }

        let mut groups: Vec<(String, Vec<AlignmentEdge>)> =
            std::mem::take(&mut self.groups).into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut edges = 0;
        let mut sequences = 0;
        for (idx, (seq_id, group)) in groups.into_iter().enumerate() {
            let mut builder: IntervalStoreBuilder<Interval> =
                IntervalStoreBuilder::new(seq_id.as_str()).with_options(self.options);
            if let Some(length) = self.lengths.get(&seq_id) {
                builder = builder.with_sequence_length(*length);
            }

            for edge in group {
                match self.checked(edge) {
                    Ok(edge) => {
                        let (src, dst) = edge.into_parts();
                        builder.push(src, Some(dst));
                    }
                    Err(message) => self.reject(message)?,
                }
            }
            if builder.is_empty() {
                continue;
            }

            let file = store_file_name(idx, &seq_id, generation);
            let path = dir.join(&file);
            let report = builder.build(&path)?;
            written.push(path);
            debug!("Sealed {} edges for {}", report.intervals, seq_id);
            self.skipped += report.skipped;
            edges += report.intervals;
            sequences += 1;

            let entry = manifest.sequences.entry(seq_id).or_default();
            entry.file = Some(file);
            entry.edges = report.intervals as u64;
            entry.inferred_end = report.inferred_end;
        }

        manifest.write_to(dir)?;
        Ok((manifest, sequences, edges))
    }

    ///
    /// Check an edge against the declared lengths, and flip a reverse-source edge onto the
    /// forward strand of its source.
    fn checked(&self, edge: AlignmentEdge) -> std::result::Result<AlignmentEdge, String> {
        for side in [edge.src(), edge.dst()] {
            if let Some(len) = self.lengths.get(&side.seq_id).filter(|len| side.end > **len) {
                return Err(format!(
                    "{} runs past the end of {} (length {})",
                    edge, side.seq_id, len
                ));
            }
        }
        if edge.is_canonical() {
            return Ok(edge);
        }
        let src_len = self.lengths.get(&edge.src().seq_id);
        let dst_len = self.lengths.get(&edge.dst().seq_id);
        let (Some(src_len), Some(dst_len)) = (src_len, dst_len) else {
            return Err(format!(
                "{} has a reverse source but the sequence lengths are not declared",
                edge
            ));
        };
        let description = edge.to_string();
        edge.canonicalize(*src_len, *dst_len)
            .map_err(|e| format!("{}: {}", description, e))
    }
}

/// The manifest currently sealing `dir`, if there is a readable one.
fn previous_manifest(dir: &Path) -> Option<Manifest> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return None;
    }
    match Manifest::try_from(path.as_path()) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!("Ignoring unreadable manifest {}: {}", path.display(), e);
            None
        }
    }
}

/// Remove the files of a failed seal.
fn discard(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Remove store files named by neither the new manifest nor the one it replaced.
fn prune(dir: &Path, manifest: &Manifest, previous: Option<&Manifest>) {
    let keep: HashSet<&str> = manifest
        .files()
        .chain(previous.into_iter().flat_map(|m| m.files()))
        .collect();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not list {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let stale = path.extension() == Some(OsStr::new(STORE_EXT))
            && path
                .file_name()
                .and_then(OsStr::to_str)
                .is_some_and(|name| !keep.contains(name));
        if stale {
            debug!("Pruning {}", path.display());
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}

/// File name for a sequence's interval store. The index keeps names unique after sanitizing and
/// the generation keeps them apart from earlier seals.
fn store_file_name(idx: usize, seq_id: &str, generation: u64) -> String {
    let safe: String = seq_id
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    format!("{}_{}.g{}.{}", idx, safe, generation, STORE_EXT)
}

