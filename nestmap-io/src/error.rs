use std::io;
use thiserror::Error;

/// Error type for nestmap-io operations.
#[derive(Error, Debug)]
pub enum EdgeDumpError {
    /// IO error occurred while reading or writing a dump.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line of the dump could not be parsed.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type alias for nestmap-io operations.
pub type Result<T> = std::result::Result<T, EdgeDumpError>;
