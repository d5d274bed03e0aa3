use std::fmt::{self, Display};

use crate::errors::{CoordError, Result};
use crate::models::interval::{Interval, resolve_slice};

/// A reading frame: 1, 2 or 3.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame(u8);

impl Frame {
    pub const ONE: Frame = Frame(1);
    pub const TWO: Frame = Frame(2);
    pub const THREE: Frame = Frame(3);

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of residues skipped before the first codon.
    pub fn offset(self) -> u64 {
        (self.0 - 1) as u64
    }

    /// The frame a codon starting at `nt_start` belongs to.
    pub fn of_position(nt_start: u64) -> Frame {
        Frame((nt_start % 3) as u8 + 1)
    }
}

impl TryFrom<u8> for Frame {
    type Error = CoordError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1..=3 => Ok(Frame(value)),
            _ => Err(CoordError::InvalidFrame(value)),
        }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// An amino acid interval, backed by the codon-aligned nucleotide range it was read from.
///
/// The frame is absolute with respect to the nucleotide frame of the strand, so the same codons
/// reached through different slices and starting frames produce equal values.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct TranslatedInterval {
    nucleotides: Interval,
    frame: Frame,
}

impl TranslatedInterval {
    pub(crate) fn from_nucleotides(nt: &Interval, frame: Frame) -> Self {
        let codon_start = (nt.start + frame.offset()).min(nt.end);
        let codons = (nt.end - codon_start) / 3;
        TranslatedInterval {
            nucleotides: Interval {
                seq_id: nt.seq_id.clone(),
                start: codon_start,
                end: codon_start + 3 * codons,
                orientation: nt.orientation,
            },
            frame: Frame::of_position(codon_start),
        }
    }

    /// Amino acid coordinate of the first codon within its frame.
    pub fn start(&self) -> u64 {
        self.nucleotides.start / 3
    }

    pub fn end(&self) -> u64 {
        self.start() + self.len()
    }

    /// Number of codons.
    pub fn len(&self) -> u64 {
        self.nucleotides.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.nucleotides.is_empty()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The nucleotide range covered by whole codons.
    pub fn nucleotides(&self) -> &Interval {
        &self.nucleotides
    }

    /// Slice in amino acid units; the frame is preserved.
    pub fn slice(&self, start: i64, end: i64) -> Result<TranslatedInterval> {
        let (lo, hi) = resolve_slice(self.len(), start, end)?;
        let base = self.nucleotides.start;
        Ok(TranslatedInterval {
            nucleotides: Interval {
                seq_id: self.nucleotides.seq_id.clone(),
                start: base + 3 * lo,
                end: base + 3 * hi,
                orientation: self.nucleotides.orientation,
            },
            frame: self.frame,
        })
    }
}

impl Display for TranslatedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})/{}",
            self.nucleotides.seq_id,
            self.start(),
            self.end(),
            self.nucleotides.orientation,
            self.frame
        )
    }
}
