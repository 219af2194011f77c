//! Anchored selection and the coverage algebra over pairs of selections.
//!
//! Invariants:
//! - `start` is the anchor; only `end` moves while a selection is extended.
//! - `min() <= max()` for every selection (derived, never stored).
//! - An empty selection (`start == end`) is just a caret.

use crate::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub start: Cursor,
    pub end: Cursor,
}

impl Selection {
    /// Selection preserving the supplied ordering (`start` stays the anchor).
    pub const fn new(start: Cursor, end: Cursor) -> Self {
        Self { start, end }
    }

    /// Collapsed selection at a single position.
    pub const fn caret(at: Cursor) -> Self {
        Self { start: at, end: at }
    }

    /// Forward selection over `[a, b)` regardless of argument order.
    pub fn ordered(a: Cursor, b: Cursor) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn min(&self) -> Cursor {
        self.start.min(self.end)
    }

    pub fn max(&self) -> Cursor {
        self.start.max(self.end)
    }

    pub fn is_forward(&self) -> bool {
        self.start <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Rows touched by the selection, inclusive on both ends.
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.min().row..=self.max().row
    }

    /// Same range, forward orientation.
    pub fn normalized(&self) -> Self {
        Self::ordered(self.start, self.end)
    }

    /// Move the free end, keeping the anchor.
    pub fn extend_to(&mut self, end: Cursor) {
        self.end = end;
    }

    /// Half-open containment: `min <= pos < max` (a caret contains nothing).
    pub fn contains(&self, pos: Cursor) -> bool {
        self.min() <= pos && pos < self.max()
    }

    /// True when `other` lies entirely within `self` (boundaries inclusive).
    pub fn covers(&self, other: &Selection) -> bool {
        self.min() <= other.min() && other.max() <= self.max()
    }

    /// Coverage merge used when a drag extends across earlier selection state.
    ///
    /// If either selection nests inside the other the outer one is returned
    /// unchanged. Otherwise the result spans `[min(mins), max(maxes))`,
    /// oriented like `newer` (the side that moved).
    pub fn cover(&self, newer: &Selection) -> Selection {
        if self.covers(newer) {
            return *self;
        }
        if newer.covers(self) {
            return *newer;
        }
        let lo = self.min().min(newer.min());
        let hi = self.max().max(newer.max());
        if newer.is_forward() {
            Selection::new(lo, hi)
        } else {
            Selection::new(hi, lo)
        }
    }
}
