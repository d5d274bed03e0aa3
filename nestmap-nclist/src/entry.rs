use num_traits::{PrimInt, Unsigned, identities::zero};

/// Represent a range from [start, end) carrying a value.
/// Inclusive start, exclusive of end
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Entry<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Check if the entry overlaps the half-open range [start, end)
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start < end && self.end > start
    }

    /// Check if `other` lies fully inside this entry
    #[inline]
    pub fn contains(&self, other: &Entry<I, T>) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub fn len(&self) -> I {
        self.end.checked_sub(&self.start).unwrap_or_else(zero::<I>)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
