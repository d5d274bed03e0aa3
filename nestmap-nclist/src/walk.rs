use crate::traits::{ContainmentLayout, Sublist};

/// One level of the walk: the next position to look at and where its list ends.
#[derive(Debug, Clone, Copy)]
struct Frame {
    next: usize,
    end: usize,
}

///
/// Depth first walk over every node of a [`ContainmentLayout`] overlapping `[start, end)`.
///
/// Each level is entered with a binary search for the first node ending after `start` and
/// scanned until a node starts at or after `end`. A node's children are only visited when the
/// node itself overlaps, and they are visited right after it, so positions come out in
/// pre-order.
///
#[derive(Debug)]
pub struct OverlapWalk<'a, L: ContainmentLayout> {
    layout: &'a L,
    start: L::Coord,
    end: L::Coord,
    stack: Vec<Frame>,
}

impl<'a, L: ContainmentLayout> OverlapWalk<'a, L> {
    pub fn new(layout: &'a L, start: L::Coord, end: L::Coord) -> Self {
        let mut walk = OverlapWalk {
            layout,
            start,
            end,
            stack: Vec::new(),
        };
        walk.descend(layout.root());
        walk
    }

    fn descend(&mut self, list: Sublist) {
        if list.is_empty() {
            return;
        }
        let next = self.layout.first_ending_after(list, self.start);
        if next < list.end() {
            self.stack.push(Frame {
                next,
                end: list.end(),
            });
        }
    }
}

impl<L: ContainmentLayout> Iterator for OverlapWalk<'_, L> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let frame = self.stack.last_mut()?;
            let pos = frame.next;
            if pos >= frame.end || self.layout.bounds(pos).0 >= self.end {
                self.stack.pop();
                continue;
            }
            frame.next += 1;
            let children = self.layout.children(pos);
            self.descend(children);
            return Some(pos);
        }
    }
}
