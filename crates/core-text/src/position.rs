use std::cmp::Ordering;
use std::fmt;

/// A position inside a buffer: row index plus byte offset within that row.
///
/// Ordering is row-major: rows compare first, then columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Clamp into `[0, line_count)` x `[0, line_len(row)]`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.row = 0;
            self.col = 0;
            return;
        }
        if self.row >= line_count {
            self.row = line_count - 1;
        }
        let max_len = line_len_fn(self.row);
        if self.col > max_len {
            self.col = max_len;
        }
    }

    pub fn clamped<F>(mut self, line_count: usize, line_len_fn: F) -> Self
    where
        F: FnMut(usize) -> usize,
    {
        self.clamp_to(line_count, line_len_fn);
        self
    }
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}
