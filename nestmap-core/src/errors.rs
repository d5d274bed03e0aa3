use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("Coordinates out of range: [{start}, {end}) on a sequence of length {len}")]
    OutOfRange { start: i64, end: i64, len: u64 },

    #[error("Intervals are not adjacent: {0} and {1}")]
    NotAdjacent(String, String),

    #[error("Invalid reading frame: {0}. Frames are 1, 2 or 3")]
    InvalidFrame(u8),

    #[error("Intervals refer to different sequences: {0} and {1}")]
    SequenceMismatch(String, String),

    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),

    #[error("Unsupported length ratio between {0} and {1}. Only 1:1, 3:1 and 1:3 edges are supported")]
    UnsupportedRatio(u64, u64),
}

pub type Result<T> = std::result::Result<T, CoordError>;
