//! # Input/Output utilities for alignment edges.
//!
//! This small crate reads and writes the line-oriented text dump that nestmap uses to move
//! alignment edges in and out of a store. Each line holds one edge as eight tab separated
//! columns, `src_id src_start src_end src_ori dst_id dst_start dst_end dst_ori`, and lines
//! starting with `#` are comments, except `#length` directives that declare sequence lengths.
//! Files ending in `.gz` are transparently (de)compressed.
//!
pub mod consts;
pub mod error;
pub mod reader;
pub mod writer;

// re-expose core functions
pub use consts::*;
pub use error::*;
pub use reader::*;
pub use writer::*;
