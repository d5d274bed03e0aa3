use std::fmt::{self, Display};

use crate::errors::{CoordError, Result};
use crate::models::frame::{Frame, TranslatedInterval};
use crate::models::orientation::Orientation;

/// Represent a range from [start, end) on one strand of a named sequence.
///
/// Coordinates live in the interval's own oriented frame: for a reverse interval, offset 0 is
/// the last residue of the forward strand. Two intervals are equal when they name the same
/// sequence, range and orientation, no matter how they were derived.
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub seq_id: String,
    pub start: u64,
    pub end: u64,
    pub orientation: Orientation,
}

impl Interval {
    pub fn new<S: Into<String>>(
        seq_id: S,
        start: u64,
        end: u64,
        orientation: Orientation,
    ) -> Result<Self> {
        if start > end {
            return Err(CoordError::OutOfRange {
                start: start as i64,
                end: end as i64,
                len: end,
            });
        }
        Ok(Interval {
            seq_id: seq_id.into(),
            start,
            end,
            orientation,
        })
    }

    /// Forward-strand interval, the common case when reading raw coordinates.
    pub fn forward<S: Into<String>>(seq_id: S, start: u64, end: u64) -> Result<Self> {
        Interval::new(seq_id, start, end, Orientation::Forward)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open overlap test against raw coordinates in this interval's frame.
    #[inline]
    pub fn overlap(&self, start: u64, end: u64) -> bool {
        self.start < end && self.end > start
    }

    /// True when both intervals sit on the same sequence and strand and share a residue.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.seq_id == other.seq_id
            && self.orientation == other.orientation
            && self.overlap(other.start, other.end)
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.seq_id == other.seq_id
            && self.orientation == other.orientation
            && self.start <= other.start
            && other.end <= self.end
    }

    ///
    /// Slice relative to this interval, with negative offsets counting from its end.
    ///
    /// Ranges running past either end are truncated. A range with no overlap at all fails with
    /// [`CoordError::OutOfRange`], except for an empty slice at an in-bounds point.
    ///
    pub fn slice(&self, start: i64, end: i64) -> Result<Interval> {
        let (lo, hi) = resolve_slice(self.len(), start, end)?;
        Ok(Interval {
            seq_id: self.seq_id.clone(),
            start: self.start + lo,
            end: self.start + hi,
            orientation: self.orientation,
        })
    }

    /// Equivalent of `[start:]`.
    pub fn slice_from(&self, start: i64) -> Result<Interval> {
        self.slice(start, self.len() as i64)
    }

    /// Equivalent of `[:end]`.
    pub fn slice_to(&self, end: i64) -> Result<Interval> {
        self.slice(0, end)
    }

    ///
    /// Flip the strand, mapping coordinates through `len - end`, `len - start`.
    ///
    /// # Arguments
    /// - seq_len: length of the underlying sequence
    ///
    pub fn reverse_complement(&self, seq_len: u64) -> Result<Interval> {
        if self.end > seq_len {
            return Err(CoordError::OutOfRange {
                start: self.start as i64,
                end: self.end as i64,
                len: seq_len,
            });
        }
        Ok(Interval {
            seq_id: self.seq_id.clone(),
            start: seq_len - self.end,
            end: seq_len - self.start,
            orientation: self.orientation.flip(),
        })
    }

    /// The same residues expressed on the requested strand.
    pub fn in_orientation(&self, orientation: Orientation, seq_len: u64) -> Result<Interval> {
        if self.orientation == orientation {
            if self.end > seq_len {
                return Err(CoordError::OutOfRange {
                    start: self.start as i64,
                    end: self.end as i64,
                    len: seq_len,
                });
            }
            Ok(self.clone())
        } else {
            self.reverse_complement(seq_len)
        }
    }

    /// The same residues in forward-strand coordinates.
    pub fn to_forward(&self, seq_len: u64) -> Result<Interval> {
        self.in_orientation(Orientation::Forward, seq_len)
    }

    ///
    /// Concatenate two contiguous intervals. `self` must end exactly where `other` starts.
    ///
    pub fn join(&self, other: &Interval) -> Result<Interval> {
        self.check_same_sequence(other)?;
        if self.orientation != other.orientation || self.end != other.start {
            return Err(CoordError::NotAdjacent(self.to_string(), other.to_string()));
        }
        Ok(Interval {
            seq_id: self.seq_id.clone(),
            start: self.start,
            end: other.end,
            orientation: self.orientation,
        })
    }

    ///
    /// The residues shared by two intervals on the same strand.
    ///
    pub fn intersect(&self, other: &Interval) -> Result<Interval> {
        self.check_same_sequence(other)?;
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if self.orientation != other.orientation || start >= end {
            return Err(CoordError::NotAdjacent(self.to_string(), other.to_string()));
        }
        Ok(Interval {
            seq_id: self.seq_id.clone(),
            start,
            end,
            orientation: self.orientation,
        })
    }

    /// Codon-aligned amino acid interval for the given reading frame.
    pub fn translate_frame(&self, frame: Frame) -> TranslatedInterval {
        TranslatedInterval::from_nucleotides(self, frame)
    }

    fn check_same_sequence(&self, other: &Interval) -> Result<()> {
        if self.seq_id != other.seq_id {
            return Err(CoordError::SequenceMismatch(
                self.seq_id.clone(),
                other.seq_id.clone(),
            ));
        }
        Ok(())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.seq_id, self.start, self.end, self.orientation
        )
    }
}

///
/// Resolve possibly negative, possibly out-of-bounds slice offsets against a length.
///
/// Returns the clamped `[lo, hi)` offsets.
///
pub fn resolve_slice(len: u64, start: i64, end: i64) -> Result<(u64, u64)> {
    let signed_len = len as i64;
    let start_adj = if start < 0 { start + signed_len } else { start };
    let end_adj = if end < 0 { end + signed_len } else { end };

    // an empty slice at a valid position is allowed
    if start_adj == end_adj && (0..=signed_len).contains(&start_adj) {
        return Ok((start_adj as u64, start_adj as u64));
    }

    let lo = start_adj.clamp(0, signed_len);
    let hi = end_adj.clamp(0, signed_len);
    if lo >= hi {
        return Err(CoordError::OutOfRange { start, end, len });
    }
    Ok((lo as u64, hi as u64))
}
