//! Line-vector document buffer and the position model layered over it.
//!
//! The buffer is the ground truth for text state. Everything else in the
//! workspace (operation log, layout cache, finder, viewport) observes it by
//! line index plus revision stamp rather than holding references into it.
//!
//! Columns are UTF-8 byte offsets into a line. Public motions only ever land
//! on grapheme cluster boundaries; `Cursor::clamp_to` keeps externally
//! supplied positions inside the buffer.

pub mod buffer;
pub mod motion;
pub mod position;
pub mod selection;
pub mod width;
pub mod word;

pub use buffer::{Buffer, Line, LineDelta, Style, StyleSpan, StyledLine};
pub use position::Cursor;
pub use selection::Selection;
pub use width::egc_width;

/// Grapheme utilities operating on a single line.
pub mod grapheme {
    use crate::width::cell_advance;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }

    /// Snap `byte` down to the nearest grapheme boundary at or before it.
    pub fn floor_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Visual column (cells) up to but not including byte offset.
    pub fn visual_col(line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += cell_advance(g, col);
        }
        col
    }

    /// Byte offset of the cluster covering `target_col`, clamped to line end.
    pub fn byte_for_visual_col(line: &str, target_col: usize) -> usize {
        let mut col = 0;
        for (b, g) in line.grapheme_indices(true) {
            let w = cell_advance(g, col);
            if col + w > target_col {
                return b;
            }
            col += w;
        }
        line.len()
    }

    /// Number of `char`s before byte offset (used for human-facing column labels).
    pub fn char_col(line: &str, byte: usize) -> usize {
        line[..byte.min(line.len())].chars().count()
    }
}
