use std::fmt::{self, Display};

use crate::errors::{CoordError, Result};
use crate::models::interval::Interval;

///
/// How many source residues make up one destination residue along an edge.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum LengthRatio {
    /// 1:1
    Identity,
    /// 3:1, a nucleotide source aligned to a protein destination
    CodonToResidue,
    /// 1:3, a protein source aligned to a nucleotide destination
    ResidueToCodon,
}

impl LengthRatio {
    /// Derive the ratio from the two lengths. Anything but 1:1, 3:1 or 1:3 is rejected.
    pub fn of(src_len: u64, dst_len: u64) -> Result<LengthRatio> {
        if src_len == dst_len {
            Ok(LengthRatio::Identity)
        } else if dst_len.checked_mul(3) == Some(src_len) {
            Ok(LengthRatio::CodonToResidue)
        } else if src_len.checked_mul(3) == Some(dst_len) {
            Ok(LengthRatio::ResidueToCodon)
        } else {
            Err(CoordError::UnsupportedRatio(src_len, dst_len))
        }
    }

    /// Map a `[lo, hi)` offset range on the source side to the destination side.
    ///
    /// For 3:1 the start is floored and the end ceiled so partial codons stay covered.
    pub fn project(self, lo: u64, hi: u64) -> (u64, u64) {
        match self {
            LengthRatio::Identity => (lo, hi),
            LengthRatio::CodonToResidue => (lo / 3, hi.div_ceil(3)),
            LengthRatio::ResidueToCodon => (lo * 3, hi * 3),
        }
    }
}

/// A source sub-interval together with the destination sub-interval it aligns to.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignedPair {
    pub src: Interval,
    pub dst: Interval,
}

impl AlignedPair {
    /// Read the same pair from the other strand of both sequences.
    pub fn reverse_complement(&self, src_len: u64, dst_len: u64) -> Result<AlignedPair> {
        Ok(AlignedPair {
            src: self.src.reverse_complement(src_len)?,
            dst: self.dst.reverse_complement(dst_len)?,
        })
    }
}

impl Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

///
/// An ungapped alignment between an interval of one sequence and an interval of another.
///
/// Offset `k` of `src` aligns to offset `k` of `dst` (scaled by the length ratio), each read in
/// its own oriented frame. The ratio is validated on construction.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct AlignmentEdge {
    src: Interval,
    dst: Interval,
    ratio: LengthRatio,
}

impl AlignmentEdge {
    pub fn new(src: Interval, dst: Interval) -> Result<AlignmentEdge> {
        let ratio = LengthRatio::of(src.len(), dst.len())?;
        Ok(AlignmentEdge { src, dst, ratio })
    }

    pub fn src(&self) -> &Interval {
        &self.src
    }

    pub fn dst(&self) -> &Interval {
        &self.dst
    }

    pub fn ratio(&self) -> LengthRatio {
        self.ratio
    }

    pub fn into_parts(self) -> (Interval, Interval) {
        (self.src, self.dst)
    }

    /// An edge is canonical when its source is on the forward strand.
    pub fn is_canonical(&self) -> bool {
        self.src.orientation.is_forward()
    }

    ///
    /// Rewrite the edge so its source is forward by reading both sides from the other strand.
    ///
    /// # Arguments
    /// - src_len: length of the source sequence
    /// - dst_len: length of the destination sequence
    ///
    pub fn canonicalize(self, src_len: u64, dst_len: u64) -> Result<AlignmentEdge> {
        if self.is_canonical() {
            return Ok(self);
        }
        Ok(AlignmentEdge {
            src: self.src.reverse_complement(src_len)?,
            dst: self.dst.reverse_complement(dst_len)?,
            ratio: self.ratio,
        })
    }

    ///
    /// Clip `[start, end)` (source coordinates) to this edge and project it onto the destination.
    ///
    /// Returns `None` when the query misses the edge entirely.
    ///
    pub fn interpolate(&self, start: u64, end: u64) -> Option<AlignedPair> {
        let clip_start = start.max(self.src.start);
        let clip_end = end.min(self.src.end);
        if clip_start > clip_end {
            return None;
        }
        let (lo, hi) = self
            .ratio
            .project(clip_start - self.src.start, clip_end - self.src.start);
        Some(AlignedPair {
            src: Interval {
                seq_id: self.src.seq_id.clone(),
                start: clip_start,
                end: clip_end,
                orientation: self.src.orientation,
            },
            dst: Interval {
                seq_id: self.dst.seq_id.clone(),
                start: self.dst.start + lo,
                end: (self.dst.start + hi).min(self.dst.end),
                orientation: self.dst.orientation,
            },
        })
    }
}

impl Display for AlignmentEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.src, self.dst)
    }
}
