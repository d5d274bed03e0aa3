use std::borrow::Cow;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::codon;
use crate::errors::{CoordError, Result};
use crate::models::frame::{Frame, TranslatedInterval};
use crate::models::interval::Interval;
use crate::models::orientation::Orientation;
use crate::residues::{self, ResidueType};

///
/// A named residue buffer. Views borrow it through an `Arc` and never copy it.
///
pub struct Sequence {
    id: String,
    residues: Arc<[u8]>,
    residue_type: OnceLock<ResidueType>,
}

impl Sequence {
    pub fn new<S: Into<String>, R: Into<Arc<[u8]>>>(id: S, residues: R) -> Self {
        Sequence {
            id: id.into(),
            residues: residues.into(),
            residue_type: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> u64 {
        self.residues.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Forward strand residues.
    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// Classified on first use, then cached for the lifetime of the buffer.
    pub fn residue_type(&self) -> ResidueType {
        *self
            .residue_type
            .get_or_init(|| residues::classify(&self.residues))
    }

    /// A forward view over the whole sequence.
    pub fn view(self: &Arc<Self>) -> SeqView {
        SeqView::whole(Arc::clone(self))
    }

    /// Residues of `interval` read along its own strand.
    pub fn oriented_residues(&self, interval: &Interval) -> Cow<'_, [u8]> {
        let len = self.len();
        match interval.orientation {
            Orientation::Forward => {
                Cow::Borrowed(&self.residues[interval.start as usize..interval.end as usize])
            }
            Orientation::Reverse => {
                let fwd_start = (len - interval.end) as usize;
                let fwd_end = (len - interval.start) as usize;
                Cow::Owned(residues::reverse_complement(
                    &self.residues[fwd_start..fwd_end],
                    self.residue_type(),
                ))
            }
        }
    }
}

impl Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("id", &self.id)
            .field("len", &self.residues.len())
            .finish()
    }
}

///
/// A window onto one strand of a [`Sequence`].
///
/// Identity is the underlying [`Interval`]; two views are equal when their intervals are,
/// regardless of which `Arc` they hold.
///
#[derive(Clone)]
pub struct SeqView {
    seq: Arc<Sequence>,
    interval: Interval,
}

impl SeqView {
    pub fn whole(seq: Arc<Sequence>) -> SeqView {
        let interval = Interval {
            seq_id: seq.id.clone(),
            start: 0,
            end: seq.len(),
            orientation: Orientation::Forward,
        };
        SeqView { seq, interval }
    }

    /// View an interval of `seq`. The interval must name `seq` and fit inside it.
    pub fn new(seq: Arc<Sequence>, interval: Interval) -> Result<SeqView> {
        if interval.seq_id != seq.id {
            return Err(CoordError::SequenceMismatch(
                interval.seq_id.clone(),
                seq.id.clone(),
            ));
        }
        if interval.end > seq.len() {
            return Err(CoordError::OutOfRange {
                start: interval.start as i64,
                end: interval.end as i64,
                len: seq.len(),
            });
        }
        Ok(SeqView { seq, interval })
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn sequence(&self) -> &Arc<Sequence> {
        &self.seq
    }

    pub fn len(&self) -> u64 {
        self.interval.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interval.is_empty()
    }

    pub fn orientation(&self) -> Orientation {
        self.interval.orientation
    }

    pub fn residue_type(&self) -> ResidueType {
        self.seq.residue_type()
    }

    /// Slice relative to this view, following negative-index-from-end semantics.
    pub fn slice(&self, start: i64, end: i64) -> Result<SeqView> {
        Ok(self.with_interval(self.interval.slice(start, end)?))
    }

    pub fn slice_from(&self, start: i64) -> Result<SeqView> {
        Ok(self.with_interval(self.interval.slice_from(start)?))
    }

    pub fn slice_to(&self, end: i64) -> Result<SeqView> {
        Ok(self.with_interval(self.interval.slice_to(end)?))
    }

    /// The same residues read from the opposite strand.
    pub fn reverse_complement(&self) -> SeqView {
        let len = self.seq.len();
        self.with_interval(Interval {
            seq_id: self.interval.seq_id.clone(),
            start: len - self.interval.end,
            end: len - self.interval.start,
            orientation: self.interval.orientation.flip(),
        })
    }

    /// Concatenate with a view that starts exactly where this one ends.
    pub fn join(&self, other: &SeqView) -> Result<SeqView> {
        Ok(self.with_interval(self.interval.join(&other.interval)?))
    }

    ///
    /// The residues shared with `other`, read on this view's strand.
    ///
    pub fn intersect(&self, other: &SeqView) -> Result<SeqView> {
        let other = other
            .interval
            .in_orientation(self.interval.orientation, self.seq.len())?;
        Ok(self.with_interval(self.interval.intersect(&other)?))
    }

    ///
    /// Translate this view in the given reading frame (1, 2 or 3).
    ///
    pub fn translation(&self, frame: u8) -> Result<Translation> {
        let frame = Frame::try_from(frame)?;
        Ok(Translation {
            seq: Arc::clone(&self.seq),
            interval: self.interval.translate_frame(frame),
        })
    }

    /// Residues along this view's strand; borrowed for forward views.
    pub fn residues(&self) -> Cow<'_, [u8]> {
        self.seq.oriented_residues(&self.interval)
    }

    fn with_interval(&self, interval: Interval) -> SeqView {
        SeqView {
            seq: Arc::clone(&self.seq),
            interval,
        }
    }
}

impl PartialEq for SeqView {
    fn eq(&self, other: &SeqView) -> bool {
        self.interval == other.interval
    }
}

impl Eq for SeqView {}

impl Hash for SeqView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interval.hash(state);
    }
}

impl Debug for SeqView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeqView({})", self.interval)
    }
}

impl Display for SeqView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.residues()))
    }
}

///
/// An amino acid view produced by [`SeqView::translation`].
///
#[derive(Clone)]
pub struct Translation {
    seq: Arc<Sequence>,
    interval: TranslatedInterval,
}

impl Translation {
    pub fn interval(&self) -> &TranslatedInterval {
        &self.interval
    }

    pub fn frame(&self) -> Frame {
        self.interval.frame()
    }

    /// Length in amino acids.
    pub fn len(&self) -> u64 {
        self.interval.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interval.is_empty()
    }

    /// Slice in amino acid units.
    pub fn slice(&self, start: i64, end: i64) -> Result<Translation> {
        Ok(Translation {
            seq: Arc::clone(&self.seq),
            interval: self.interval.slice(start, end)?,
        })
    }

    /// Amino acid residues, one byte per codon.
    pub fn residues(&self) -> Vec<u8> {
        codon::translate(&self.seq.oriented_residues(self.interval.nucleotides()))
    }
}

impl PartialEq for Translation {
    fn eq(&self, other: &Translation) -> bool {
        self.interval == other.interval
    }
}

impl Eq for Translation {}

impl Debug for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Translation({})", self.interval)
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.residues()))
    }
}
