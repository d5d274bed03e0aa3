use std::io;

use nestmap_core::CoordError;
use nestmap_io::EdgeDumpError;
use nestmap_store::StoreError;
use thiserror::Error;

/// Error type for nestmap-align operations.
#[derive(Error, Debug)]
pub enum AlignError {
    /// The sequence is not part of the alignment store, or the store itself is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The manifest could not be read or written.
    #[error("Bad manifest: {0}")]
    Manifest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dump(#[from] EdgeDumpError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for AlignError {
    fn from(e: toml::de::Error) -> Self {
        AlignError::Manifest(e.to_string())
    }
}

impl From<toml::ser::Error> for AlignError {
    fn from(e: toml::ser::Error) -> Self {
        AlignError::Manifest(e.to_string())
    }
}

/// Result type alias for nestmap-align operations.
pub type Result<T> = std::result::Result<T, AlignError>;
