use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::io::Write;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{AlignError, Result};

/// File name of the manifest inside an alignment store directory
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// What the manifest knows about one sequence.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Interval store holding the edges out of this sequence, relative to the store directory.
    /// Sequences that only ever appear as a destination have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Declared length of the sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Largest forward end seen when no length was declared. Never used as a length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_end: Option<u64>,
    #[serde(default)]
    pub edges: u64,
}

///
/// The sealed description of an alignment store directory:
///
/// ```toml
/// version = 1
/// generation = 3
///
/// [sequences.chr1]
/// file = "0_chr1.g3.nms"
/// length = 5000
/// edges = 12
///
/// [sequences.prot]
/// length = 300
/// ```
///
/// A directory is only a usable alignment store once this file exists, and it is always written
/// last. Each seal bumps the generation, which also names its interval store files.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub generation: u64,
    #[serde(default)]
    pub sequences: BTreeMap<String, SequenceEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            version: MANIFEST_VERSION,
            generation: 0,
            sequences: BTreeMap::new(),
        }
    }
}

impl Manifest {
    pub fn sequence(&self, seq_id: &str) -> Option<&SequenceEntry> {
        self.sequences.get(seq_id)
    }

    pub fn length(&self, seq_id: &str) -> Option<u64> {
        self.sequences.get(seq_id).and_then(|entry| entry.length)
    }

    /// Interval store files named by the manifest.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.sequences
            .values()
            .filter_map(|entry| entry.file.as_deref())
    }

    /// Total number of edges across every sequence.
    pub fn edge_count(&self) -> u64 {
        self.sequences.values().map(|entry| entry.edges).sum()
    }

    /// Write the manifest into `dir` through a temporary file and a rename.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(dir.join(MANIFEST_FILE))
            .map_err(|e| AlignError::Io(e.error))?;
        Ok(())
    }
}

impl TryFrom<&Path> for Manifest {
    type Error = AlignError;

    fn try_from(value: &Path) -> Result<Self> {
        let manifest: Manifest = toml::from_str(&read_to_string(value)?)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(AlignError::Manifest(format!(
                "unsupported manifest version {}",
                manifest.version
            )));
        }
        let escaping = manifest
            .sequences
            .iter()
            .find(|(_, entry)| entry.file.as_deref().is_some_and(|f| !is_plain_file_name(f)));
        if let Some((seq_id, entry)) = escaping {
            return Err(AlignError::Manifest(format!(
                "store file {:?} of {} is outside the store directory",
                entry.file, seq_id
            )));
        }
        Ok(manifest)
    }
}

/// A relative path that stays inside the directory it is joined to.
fn is_plain_file_name(file: &str) -> bool {
    !file.is_empty()
        && Path::new(file)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
