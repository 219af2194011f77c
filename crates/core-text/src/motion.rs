//! Cursor motion helpers.
//!
//! Pure functions over a `Buffer` + `Cursor` pair, free of editor state. Every
//! motion clamps at buffer edges instead of failing: moving up from row 0
//! lands on the first position, moving down from the last row on the last.

use crate::{Buffer, Cursor, grapheme, word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Move one grapheme left, wrapping to the end of the previous line.
pub fn left(buf: &Buffer, pos: Cursor) -> Cursor {
    if pos.col > 0 {
        return Cursor::new(pos.row, grapheme::prev_boundary(buf.line_text(pos.row), pos.col));
    }
    if pos.row == 0 {
        return pos;
    }
    Cursor::new(pos.row - 1, buf.line_len(pos.row - 1))
}

/// Move one grapheme right, wrapping to the start of the next line.
pub fn right(buf: &Buffer, pos: Cursor) -> Cursor {
    let len = buf.line_len(pos.row);
    if pos.col < len {
        return Cursor::new(pos.row, grapheme::next_boundary(buf.line_text(pos.row), pos.col));
    }
    if pos.row + 1 >= buf.line_count() {
        return pos;
    }
    Cursor::new(pos.row + 1, 0)
}

pub fn char_motion(buf: &Buffer, pos: Cursor, dir: Direction) -> Cursor {
    match dir {
        Direction::Backward => left(buf, pos),
        Direction::Forward => right(buf, pos),
    }
}

pub fn line_start(pos: Cursor) -> Cursor {
    Cursor::new(pos.row, 0)
}

pub fn line_end(buf: &Buffer, pos: Cursor) -> Cursor {
    Cursor::new(pos.row, buf.line_len(pos.row))
}

pub fn document_start() -> Cursor {
    Cursor::origin()
}

pub fn document_end(buf: &Buffer) -> Cursor {
    buf.end()
}

/// Move `rows` lines up or down preserving a sticky visual column. Returns the
/// new position and the sticky column to carry into the next vertical motion.
/// A move that would pass the first/last row (a page motion near the edge
/// included) lands on the first/last position.
pub fn vertical(
    buf: &Buffer,
    pos: Cursor,
    dir: Direction,
    rows: usize,
    sticky_col: Option<usize>,
) -> (Cursor, Option<usize>) {
    let sticky = sticky_col.unwrap_or_else(|| grapheme::visual_col(buf.line_text(pos.row), pos.col));
    let last = buf.line_count() - 1;
    let target = match dir {
        Direction::Backward => {
            if pos.row < rows {
                return (document_start(), None);
            }
            pos.row - rows
        }
        Direction::Forward => {
            if pos.row + rows > last {
                return (buf.end(), None);
            }
            pos.row + rows
        }
    };
    let col = grapheme::byte_for_visual_col(buf.line_text(target), sticky);
    (Cursor::new(target, col), Some(sticky))
}

/// Move to the next/previous word boundary. A line break counts as a boundary
/// of its own; at the buffer edges the position is returned unchanged.
pub fn word_motion(buf: &Buffer, pos: Cursor, dir: Direction) -> Cursor {
    let line = buf.line_text(pos.row);
    match dir {
        Direction::Forward => {
            if let Some(next) = word::next_boundary(line, pos.col) {
                Cursor::new(pos.row, next)
            } else if pos.col < line.len() {
                line_end(buf, pos)
            } else if pos.row + 1 < buf.line_count() {
                Cursor::new(pos.row + 1, 0)
            } else {
                pos
            }
        }
        Direction::Backward => {
            if let Some(prev) = word::prev_boundary(line, pos.col) {
                Cursor::new(pos.row, prev)
            } else if pos.col > 0 {
                line_start(pos)
            } else if pos.row > 0 {
                Cursor::new(pos.row - 1, buf.line_len(pos.row - 1))
            } else {
                pos
            }
        }
    }
}

/// Paragraph motion: go to the current line's edge first, otherwise to the
/// matching edge of the adjacent line.
pub fn paragraph_motion(buf: &Buffer, pos: Cursor, dir: Direction) -> Cursor {
    match dir {
        Direction::Backward => {
            if pos.col > 0 || pos.row == 0 {
                line_start(pos)
            } else {
                Cursor::new(pos.row - 1, 0)
            }
        }
        Direction::Forward => {
            let len = buf.line_len(pos.row);
            if pos.col < len || pos.row + 1 >= buf.line_count() {
                Cursor::new(pos.row, len)
            } else {
                Cursor::new(pos.row + 1, buf.line_len(pos.row + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_wraps_and_clamps() {
        let buf = Buffer::from_lines(["ab😀", "c"]);
        let mut pos = Cursor::origin();
        pos = left(&buf, pos);
        assert_eq!(pos, Cursor::origin());
        for _ in 0..3 {
            pos = right(&buf, pos);
        }
        assert_eq!(pos, Cursor::new(0, buf.line_len(0)));
        pos = right(&buf, pos);
        assert_eq!(pos, Cursor::new(1, 0));
        pos = right(&buf, right(&buf, pos));
        assert_eq!(pos, Cursor::new(1, 1));
        assert_eq!(left(&buf, Cursor::new(1, 0)), Cursor::new(0, buf.line_len(0)));
    }

    #[test]
    fn vertical_sticky_column() {
        let buf = Buffer::from_lines(["hello world", "ab", "long line here"]);
        let (p, sticky) = vertical(&buf, Cursor::new(0, 8), Direction::Forward, 1, None);
        assert_eq!(p, Cursor::new(1, 2));
        let (p, sticky) = vertical(&buf, p, Direction::Forward, 1, sticky);
        assert_eq!(p, Cursor::new(2, 8));
        assert_eq!(sticky, Some(8));
    }

    #[test]
    fn vertical_clamps_at_edges() {
        let buf = Buffer::from_lines(["abc", "defgh"]);
        let (p, sticky) = vertical(&buf, Cursor::new(0, 2), Direction::Backward, 1, None);
        assert_eq!(p, Cursor::origin());
        assert_eq!(sticky, None);
        let (p, _) = vertical(&buf, Cursor::new(1, 1), Direction::Forward, 1, None);
        assert_eq!(p, Cursor::new(1, 5));
        let (p, sticky) = vertical(&buf, Cursor::new(1, 1), Direction::Backward, 10, None);
        assert_eq!((p, sticky), (Cursor::origin(), None));
        let (p, sticky) = vertical(&buf, Cursor::new(0, 1), Direction::Forward, 10, None);
        assert_eq!((p, sticky), (Cursor::new(1, 5), None));
        let (p, _) = vertical(&buf, Cursor::new(1, 3), Direction::Backward, 1, None);
        assert_eq!(p, Cursor::new(0, 3));
    }

    #[test]
    fn word_forward_and_backward() {
        let buf = Buffer::from_lines(["foo, bar baz", "  qux"]);
        let mut p = Cursor::origin();
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(0, 3));
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(0, 4));
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(0, 8));
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(0, 12));
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(1, 0));
        p = word_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(1, 5));
        p = word_motion(&buf, p, Direction::Backward);
        assert_eq!(p, Cursor::new(1, 2));
        p = word_motion(&buf, p, Direction::Backward);
        assert_eq!(p, Cursor::new(1, 0));
        p = word_motion(&buf, p, Direction::Backward);
        assert_eq!(p, Cursor::new(0, 12));
        p = word_motion(&buf, p, Direction::Backward);
        assert_eq!(p, Cursor::new(0, 9));
    }

    #[test]
    fn word_forward_at_end_of_buffer_is_idempotent() {
        let buf = Buffer::from_lines(["abc", "def"]);
        let end = buf.end();
        assert_eq!(word_motion(&buf, end, Direction::Forward), end);
        assert_eq!(word_motion(&buf, Cursor::origin(), Direction::Backward), Cursor::origin());
    }

    #[test]
    fn paragraph_edges_then_adjacent_line() {
        let buf = Buffer::from_lines(["abc", "defg"]);
        let p = paragraph_motion(&buf, Cursor::new(0, 1), Direction::Forward);
        assert_eq!(p, Cursor::new(0, 3));
        let p = paragraph_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(1, 4));
        let p = paragraph_motion(&buf, p, Direction::Forward);
        assert_eq!(p, Cursor::new(1, 4));
        let p = paragraph_motion(&buf, Cursor::new(1, 2), Direction::Backward);
        assert_eq!(p, Cursor::new(1, 0));
        let p = paragraph_motion(&buf, p, Direction::Backward);
        assert_eq!(p, Cursor::new(0, 0));
    }
}
