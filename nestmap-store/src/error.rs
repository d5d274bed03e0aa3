use std::io;
use std::path::PathBuf;

use nestmap_core::CoordError;
use thiserror::Error;

/// Error type for nestmap-store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Malformed input handed to a builder.
    #[error("Invalid input for store build: {0}")]
    BuildError(String),

    /// The file is not a store this version can read.
    #[error("Corrupt store file {path:?}: {message}")]
    CorruptFormat { path: PathBuf, message: String },

    /// A reverse coordinate was needed but the sequence length was never recorded.
    #[error("Length of sequence {0} is unknown")]
    UnknownLength(String),

    #[error("No store found at {0:?}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// A payload blob could not be (de)serialized.
    #[error("Payload encoding error: {0}")]
    Payload(#[from] bincode::Error),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
