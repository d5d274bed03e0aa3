use num_traits::{PrimInt, Unsigned};

pub use crate::entry::Entry;

pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(entries: Vec<Entry<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Entry<I, T>>;

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Entry<I, T>> + 'a>;
}

/// A contiguous run of nodes in a containment layout: the root list or one node's children.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
pub struct Sublist {
    pub start: usize,
    pub len: usize,
}

impl Sublist {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

///
/// A flattened nested containment list, however it is stored.
///
/// Nodes are addressed by their position in the layout. The root list and every child list
/// occupy contiguous positions and are sorted by start, so their ends are strictly increasing.
/// Both the in-memory [`crate::NCList`] and memory-mapped stores implement this, and share the
/// query walk in [`crate::walk::OverlapWalk`].
///
pub trait ContainmentLayout {
    type Coord: PrimInt + Unsigned;

    /// The top level list.
    fn root(&self) -> Sublist;

    /// `(start, end)` of the node at `pos`.
    fn bounds(&self, pos: usize) -> (Self::Coord, Self::Coord);

    /// The children of the node at `pos`.
    fn children(&self, pos: usize) -> Sublist;

    /// Position of the first node in `list` whose end lies past `start`, or `list.end()`.
    fn first_ending_after(&self, list: Sublist, start: Self::Coord) -> usize {
        let mut low = list.start;
        let mut high = list.end();
        while low < high {
            let mid = low + (high - low) / 2;
            if self.bounds(mid).1 > start {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }
}
