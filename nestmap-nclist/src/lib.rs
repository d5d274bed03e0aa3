//! Nested containment list interval index.
//!
//! This crate provides the [`NCList`] data structure for overlap queries over collections of
//! intervals that frequently nest inside each other, such as alignment blocks or annotation
//! hierarchies. It is the in-memory half of nestmap; the on-disk store in `nestmap-store`
//! lays its records out the same way and reuses the query walk through [`ContainmentLayout`].
//!
//! ## Quick Start
//!
//! ```rust
//! use nestmap_nclist::{NCList, Overlapper, Entry};
//!
//! let intervals = vec![
//!     Entry { start: 100u32, end: 200, val: "block1" },
//!     Entry { start: 150, end: 300, val: "block2" },
//!     Entry { start: 400, end: 500, val: "block3" },
//! ];
//!
//! let index = NCList::build(intervals);
//!
//! let overlaps = index.find(180, 250);
//! assert_eq!(overlaps.len(), 2);
//!
//! for entry in index.find_iter(180, 250) {
//!     println!("Found overlap: {:?}", entry);
//! }
//! ```

pub mod entry;

/// Nested containment list implementation.
///
/// See [`NCList`] for details.
pub mod nclist;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] and [`ContainmentLayout`].
pub mod traits;

/// The shared depth first query walk.
pub mod walk;

// re-exports
pub use self::nclist::NCList;
pub use self::traits::{ContainmentLayout, Entry, Overlapper, Sublist};
pub use self::walk::OverlapWalk;
