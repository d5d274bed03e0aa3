//! # Alignment stores
//!
//! An alignment store maps intervals of a source sequence onto the intervals of other sequences
//! they are aligned to. Edges are grouped by source sequence into one on-disk interval store
//! each, with the destination interval as payload, and a TOML manifest seals the directory.
//!
//! ```rust
//! use nestmap_align::AlignmentStore;
//! use nestmap_core::models::Interval;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let edges = vec![(
//!     Interval::forward("chr1", 100, 200).unwrap(),
//!     Interval::forward("chr2", 1000, 1100).unwrap(),
//! )];
//! AlignmentStore::build(edges, dir.path()).unwrap();
//!
//! let store = AlignmentStore::open(dir.path()).unwrap();
//! let pairs = store.aligned_to("chr1", 150, 250).unwrap();
//! assert_eq!(pairs[0].dst, Interval::forward("chr2", 1050, 1100).unwrap());
//! ```
pub mod builder;
pub mod error;
pub mod manifest;
pub mod store;

pub use builder::{AlignmentStoreBuilder, SealReport};
pub use error::{AlignError, Result};
pub use manifest::{MANIFEST_FILE, Manifest, SequenceEntry};
pub use store::AlignmentStore;
