//! # Core types for nestmap
//!
//! This crate holds the value types the rest of the workspace is built on: oriented intervals
//! and their coordinate algebra, reading frames, alignment edges, and views over shared residue
//! buffers.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use nestmap_core::models::Sequence;
//!
//! let s = Arc::new(Sequence::new("foo", b"atttgactatgctccag".to_vec())).view();
//! assert_eq!(s.slice(5, 10).unwrap().to_string(), "actat");
//! assert_eq!(s.reverse_complement().slice(5, 10).unwrap().to_string(), "gcata");
//! ```
pub mod codon;
pub mod errors;
pub mod models;
pub mod residues;
pub mod utils;

pub use errors::{CoordError, Result};
