use std::cmp::Ordering;
use std::collections::VecDeque;

use num_traits::{PrimInt, Unsigned};

use crate::traits::{ContainmentLayout, Entry, Overlapper, Sublist};
use crate::walk::OverlapWalk;

/// A Nested Containment List for overlap queries over intervals that nest inside each other.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/23/11/1386/199545>
///
/// Intervals fully contained in another interval are moved into that interval's child list,
/// so every list is free of containment and can be binary searched on its ends. The whole
/// forest is flattened into one array: the root list first, then each child list in the
/// breadth-first order of its parent. Each node records where its children start and how many
/// there are.
///
/// Queries cost O(log N + K) and report matches in depth-first pre-order, every copy of a
/// duplicated interval included.
///
/// # Examples
///
/// ```
/// use nestmap_nclist::{NCList, Overlapper, Entry};
///
/// let exons = vec![
///     Entry { start: 100u64, end: 500, val: "gene" },
///     Entry { start: 120, end: 180, val: "exon1" },
///     Entry { start: 300, end: 350, val: "exon2" },
///     Entry { start: 600, end: 700, val: "other" },
/// ];
///
/// let index = NCList::build(exons);
/// let hits: Vec<&str> = index.find_iter(150, 320).map(|e| e.val).collect();
/// assert_eq!(hits, vec!["gene", "exon1", "exon2"]);
/// assert_eq!(index.root_len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct NCList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Entries in layout order
    entries: Vec<Entry<I, T>>,
    /// Child list of each entry, parallel to `entries`
    children: Vec<Sublist>,
    /// Number of entries in the root list
    root_len: usize,
}

impl<I, T> Overlapper<I, T> for NCList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Build the list in one pass over the sorted entries. Entries are expected to satisfy
    /// `start <= end`.
    fn build(mut entries: Vec<Entry<I, T>>) -> Self
    where
        Self: Sized,
    {
        debug_assert!(entries.iter().all(|e| e.start <= e.end));

        entries.sort_by(|a, b| match a.start.cmp(&b.start) {
            Ordering::Equal => b.end.cmp(&a.end),
            other => other,
        });

        // children of each sorted entry; they arrive already sorted
        let mut nested: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
        let mut roots: Vec<usize> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            while let Some(&top) = open.last() {
                if entries[top].end < entry.end {
                    open.pop();
                } else {
                    break;
                }
            }
            match open.last() {
                Some(&parent) => nested[parent].push(idx),
                None => roots.push(idx),
            }
            open.push(idx);
        }

        // breadth first flattening
        let root_len = roots.len();
        let mut layout: Vec<usize> = Vec::with_capacity(entries.len());
        let mut children = vec![Sublist::default(); entries.len()];
        let mut queue: VecDeque<usize> = VecDeque::new();
        for idx in roots {
            queue.push_back(layout.len());
            layout.push(idx);
        }
        while let Some(pos) = queue.pop_front() {
            let kids = std::mem::take(&mut nested[layout[pos]]);
            if kids.is_empty() {
                continue;
            }
            children[pos] = Sublist {
                start: layout.len(),
                len: kids.len(),
            };
            for idx in kids {
                queue.push_back(layout.len());
                layout.push(idx);
            }
        }

        let mut slots: Vec<Option<Entry<I, T>>> = entries.into_iter().map(Some).collect();
        let entries = layout
            .iter()
            .filter_map(|&idx| slots[idx].take())
            .collect();

        NCList {
            entries,
            children,
            root_len,
        }
    }

    #[inline]
    fn find(&self, start: I, end: I) -> Vec<Entry<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Entry<I, T>> + 'a> {
        Box::new(self.walk(start, end))
    }
}

impl<I, T> NCList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Iterate over the entries overlapping [start, end) without boxing.
    pub fn walk(&self, start: I, end: I) -> IterFind<'_, I, T> {
        IterFind {
            inner: self,
            walk: OverlapWalk::new(self, start, end),
        }
    }

    /// Count the entries overlapping [start, end) without collecting them.
    pub fn count(&self, start: I, end: I) -> usize {
        OverlapWalk::new(self, start, end).count()
    }

    /// Get the number of entries in the list
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty (i.e. has no entries)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries not contained in any other entry
    #[inline]
    pub fn root_len(&self) -> usize {
        self.root_len
    }

    /// Entries in layout order
    #[inline]
    pub fn entries(&self) -> &[Entry<I, T>] {
        &self.entries
    }

    /// Child list of the entry at layout position `pos`
    #[inline]
    pub fn child_list(&self, pos: usize) -> Sublist {
        self.children[pos]
    }

    /// Return an iterator over all entries in layout order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<I, T>> {
        self.entries.iter()
    }
}

impl<I, T> ContainmentLayout for NCList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    type Coord = I;

    #[inline]
    fn root(&self) -> Sublist {
        Sublist {
            start: 0,
            len: self.root_len,
        }
    }

    #[inline]
    fn bounds(&self, pos: usize) -> (I, I) {
        let entry = &self.entries[pos];
        (entry.start, entry.end)
    }

    #[inline]
    fn children(&self, pos: usize) -> Sublist {
        self.children[pos]
    }
}

/// An iterator over entries in an [`NCList`] that overlap a query range, in pre-order.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a NCList<I, T>,
    walk: OverlapWalk<'a, NCList<I, T>>,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Entry<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|pos| &self.inner.entries[pos])
    }
}

impl<I, T> IntoIterator for NCList<I, T>
where
    T: Eq + Clone + Send + Sync,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = Entry<I, T>;
    type IntoIter = ::std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, I, T> IntoIterator for &'a NCList<I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Entry<I, T>;
    type IntoIter = std::slice::Iter<'a, Entry<I, T>>;

    fn into_iter(self) -> std::slice::Iter<'a, Entry<I, T>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rstest::{fixture, rstest};

    fn entry(start: u64, end: u64, val: u32) -> Entry<u64, u32> {
        Entry { start, end, val }
    }

    #[fixture]
    fn nested() -> Vec<Entry<u64, u32>> {
        vec![
            entry(0, 100, 0),
            entry(10, 20, 1),
            entry(12, 18, 2),
            entry(30, 60, 3),
            entry(50, 120, 4),
            entry(55, 70, 5),
            entry(200, 210, 6),
        ]
    }

    fn brute_force(entries: &[Entry<u64, u32>], start: u64, end: u64) -> Vec<u32> {
        let mut hits: Vec<u32> = entries
            .iter()
            .filter(|e| e.overlap(start, end))
            .map(|e| e.val)
            .collect();
        hits.sort();
        hits
    }

    fn sorted_vals<'a>(hits: impl Iterator<Item = &'a Entry<u64, u32>>) -> Vec<u32> {
        let mut vals: Vec<u32> = hits.map(|e| e.val).collect();
        vals.sort();
        vals
    }

    #[rstest]
    fn test_build_and_len(nested: Vec<Entry<u64, u32>>) {
        let list = NCList::build(nested.clone());
        assert_eq!(list.len(), nested.len());
        assert!(!list.is_empty());
        assert_eq!(list.root_len(), 3);
    }

    #[rstest]
    fn test_layout(nested: Vec<Entry<u64, u32>>) {
        let list = NCList::build(nested);
        let order: Vec<u32> = list.iter().map(|e| e.val).collect();
        // roots, then children of 0, then children of 1 and 4
        assert_eq!(order, vec![0, 4, 6, 1, 3, 5, 2]);
        assert_eq!(list.child_list(0), Sublist { start: 3, len: 2 });
        assert_eq!(list.child_list(1), Sublist { start: 5, len: 1 });
        assert_eq!(list.child_list(2), Sublist::default());
        assert_eq!(list.child_list(3), Sublist { start: 6, len: 1 });
    }

    #[rstest]
    fn test_lists_are_containment_free(nested: Vec<Entry<u64, u32>>) {
        let list = NCList::build(nested);
        let mut lists = vec![list.root()];
        lists.extend((0..list.len()).map(|pos| list.child_list(pos)));
        for sub in lists {
            for pos in sub.start + 1..sub.end() {
                assert!(list.bounds(pos - 1).0 <= list.bounds(pos).0);
                assert!(list.bounds(pos - 1).1 < list.bounds(pos).1);
            }
        }
        for pos in 0..list.len() {
            let parent = &list.entries()[pos];
            let kids = list.child_list(pos);
            for kid in &list.entries()[kids.start..kids.end()] {
                assert!(parent.contains(kid));
            }
        }
    }

    #[rstest]
    fn test_find_preorder(nested: Vec<Entry<u64, u32>>) {
        let list = NCList::build(nested);
        let hits: Vec<u32> = list.find_iter(15, 56).map(|e| e.val).collect();
        assert_eq!(hits, vec![0, 1, 2, 3, 4, 5]);
    }

    #[rstest]
    #[case(0, 1000)]
    #[case(15, 16)]
    #[case(100, 200)]
    #[case(120, 200)]
    #[case(20, 30)]
    #[case(205, 206)]
    fn test_find_matches_brute_force(
        nested: Vec<Entry<u64, u32>>,
        #[case] start: u64,
        #[case] end: u64,
    ) {
        let list = NCList::build(nested.clone());
        assert_eq!(
            sorted_vals(list.find_iter(start, end)),
            brute_force(&nested, start, end)
        );
        assert_eq!(list.count(start, end), brute_force(&nested, start, end).len());
    }

    #[rstest]
    fn test_find_no_overlap(nested: Vec<Entry<u64, u32>>) {
        let list = NCList::build(nested);
        assert!(list.find(130, 200).is_empty());
        assert!(list.find(1000, 2000).is_empty());
    }

    #[rstest]
    fn test_empty_list() {
        let list: NCList<u64, u32> = NCList::build(vec![]);
        assert!(list.is_empty());
        assert_eq!(list.root_len(), 0);
        assert!(list.find(0, 100).is_empty());
    }

    #[rstest]
    fn test_duplicates_reported_once_each() {
        let list = NCList::build(vec![entry(5, 10, 1), entry(5, 10, 2), entry(5, 10, 3)]);
        assert_eq!(list.root_len(), 1);
        assert_eq!(sorted_vals(list.find_iter(6, 7)), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_zero_length_query() {
        let list = NCList::build(vec![entry(5, 10, 1), entry(10, 20, 2)]);
        // half-open: [10, 10) overlaps nothing ending at 10 and nothing starting at 10
        assert!(list.find(10, 10).is_empty());
        assert_eq!(sorted_vals(list.find_iter(7, 7)), vec![1]);
    }

    #[rstest]
    fn test_zero_length_entries() {
        let entries = vec![entry(5, 5, 1), entry(0, 10, 2), entry(5, 8, 3)];
        let list = NCList::build(entries.clone());
        for (start, end) in [(4, 6), (5, 6), (0, 5), (5, 5), (6, 9)] {
            assert_eq!(
                sorted_vals(list.find_iter(start, end)),
                brute_force(&entries, start, end)
            );
        }
    }

    #[rstest]
    fn test_randomized_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(0..300);
            let entries: Vec<Entry<u64, u32>> = (0..n)
                .map(|i| {
                    let start = rng.random_range(0..1000);
                    let len = rng.random_range(0..200);
                    entry(start, start + len, i)
                })
                .collect();
            let list = NCList::build(entries.clone());
            for _ in 0..50 {
                let start = rng.random_range(0..1200);
                let len = rng.random_range(0..100);
                assert_eq!(
                    sorted_vals(list.find_iter(start, start + len)),
                    brute_force(&entries, start, start + len)
                );
            }
        }
    }

    #[rstest]
    fn test_insertion_order_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut entries: Vec<Entry<u64, u32>> = (0..200)
            .map(|i| {
                let start = rng.random_range(0..500);
                entry(start, start + rng.random_range(1..80), i)
            })
            .collect();
        let first = NCList::build(entries.clone());
        entries.shuffle(&mut rng);
        let second = NCList::build(entries);
        for start in (0..600).step_by(13) {
            assert_eq!(
                sorted_vals(first.find_iter(start, start + 20)),
                sorted_vals(second.find_iter(start, start + 20))
            );
        }
    }

    /// Hands out a list's layout while counting how often interval bounds are read.
    struct CountingLayout<'a> {
        list: &'a NCList<u64, u32>,
        reads: Cell<usize>,
    }

    impl ContainmentLayout for CountingLayout<'_> {
        type Coord = u64;

        fn root(&self) -> Sublist {
            self.list.root()
        }

        fn bounds(&self, pos: usize) -> (u64, u64) {
            self.reads.set(self.reads.get() + 1);
            self.list.bounds(pos)
        }

        fn children(&self, pos: usize) -> Sublist {
            self.list.children(pos)
        }
    }

    #[rstest]
    #[case(1_000_000, 1_000_001)]
    #[case(1_000_015, 1_000_025)]
    #[case(500_000, 501_000)]
    #[case(1_999_995, 2_100_000)]
    fn test_query_cost_tracks_hits_not_size(#[case] start: u64, #[case] end: u64) {
        // blocks of [b, b+90) holding [b+10, b+40) > [b+20, b+30) and [b+50, b+60)
        let entries: Vec<Entry<u64, u32>> = (0..20_000u64)
            .flat_map(|i| {
                let b = i * 100;
                [
                    entry(b, b + 90, 0),
                    entry(b + 10, b + 40, 1),
                    entry(b + 20, b + 30, 2),
                    entry(b + 50, b + 60, 3),
                ]
            })
            .collect();
        let n = entries.len();
        let list = NCList::build(entries);

        let counting = CountingLayout {
            list: &list,
            reads: Cell::new(0),
        };
        let hits = OverlapWalk::new(&counting, start, end).count();
        assert_eq!(hits, list.find(start, end).len());

        // one binary search per list entered, plus one read per hit and one to close each list
        let search = (usize::BITS - n.leading_zeros()) as usize;
        let reads = counting.reads.get();
        assert!(reads <= (hits + 1) * (search + 1) + hits, "{} reads for {} hits", reads, hits);
        assert!(reads < n / 20, "{} reads for {} intervals", reads, n);
    }
}
