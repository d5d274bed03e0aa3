//! # nestmap
//!
//! Nested containment lists, on disk and in memory, and the alignment stores built on top of
//! them. Each piece lives in its own crate and is re-exported here behind a feature flag:
//!
//! - `core`: intervals, orientation, sequence views and translation
//! - `nclist`: the in-memory nested containment list
//! - `io`: the text edge dump format
//! - `store`: memory-mapped interval stores
//! - `align`: alignment stores
//!
//! `full` turns on all of them.

#[cfg(feature = "core")]
#[doc(inline)]
pub use nestmap_core as core;

#[cfg(feature = "nclist")]
#[doc(inline)]
pub use nestmap_nclist as nclist;

#[cfg(feature = "io")]
#[doc(inline)]
pub use nestmap_io as io;

#[cfg(feature = "store")]
#[doc(inline)]
pub use nestmap_store as store;

#[cfg(feature = "align")]
#[doc(inline)]
pub use nestmap_align as align;
