//! Cursor and selection movement. None of these touch content or history.

use core_events::Edge;
use core_text::motion::{self, Direction};
use core_text::{Cursor, Selection, word};

use crate::editor::Editor;

impl Editor {
    fn place(&mut self, to: Cursor, selecting: bool) {
        if selecting {
            self.selection.extend_to(to);
        } else {
            self.selection = Selection::caret(to);
        }
        self.follow_cursor();
    }

    /// Move the cursor to `to` (clamped into the buffer), optionally extending
    /// the selection from its anchor.
    pub fn move_cursor(&mut self, to: Cursor, selecting: bool) {
        let to = self.doc.buffer().clamp(to);
        self.sticky_col = None;
        self.place(to, selecting);
    }

    /// One grapheme left or right. Without `selecting`, an active selection
    /// collapses to the edge in the direction of travel instead.
    pub fn move_char(&mut self, dir: Direction, selecting: bool) {
        self.sticky_col = None;
        let to = if !selecting && !self.selection.is_empty() {
            match dir {
                Direction::Backward => self.selection.min(),
                Direction::Forward => self.selection.max(),
            }
        } else {
            motion::char_motion(self.doc.buffer(), self.cursor(), dir)
        };
        self.place(to, selecting);
    }

    pub fn move_word(&mut self, dir: Direction, selecting: bool) {
        self.sticky_col = None;
        let to = motion::word_motion(self.doc.buffer(), self.cursor(), dir);
        self.place(to, selecting);
    }

    pub fn move_paragraph(&mut self, dir: Direction, selecting: bool) {
        self.sticky_col = None;
        let to = motion::paragraph_motion(self.doc.buffer(), self.cursor(), dir);
        self.place(to, selecting);
    }

    /// One row up or down, keeping the visual column across consecutive moves.
    pub fn move_line(&mut self, dir: Direction, selecting: bool) {
        self.move_rows(dir, 1, selecting);
    }

    /// One viewport height up or down.
    pub fn move_page(&mut self, dir: Direction, selecting: bool) {
        let rows = self.page_rows().max(1);
        self.move_rows(dir, rows, selecting);
    }

    fn move_rows(&mut self, dir: Direction, rows: usize, selecting: bool) {
        let (to, sticky) =
            motion::vertical(self.doc.buffer(), self.cursor(), dir, rows, self.sticky_col);
        self.sticky_col = sticky;
        self.place(to, selecting);
    }

    pub fn move_line_edge(&mut self, edge: Edge, selecting: bool) {
        self.sticky_col = None;
        let at = self.cursor();
        let to = match edge {
            Edge::Start => motion::line_start(at),
            Edge::End => motion::line_end(self.doc.buffer(), at),
        };
        self.place(to, selecting);
    }

    pub fn move_document_edge(&mut self, edge: Edge, selecting: bool) {
        self.sticky_col = None;
        let to = match edge {
            Edge::Start => motion::document_start(),
            Edge::End => motion::document_end(self.doc.buffer()),
        };
        self.place(to, selecting);
    }

    pub fn select_all(&mut self) {
        self.sticky_col = None;
        self.selection = Selection::new(Cursor::origin(), self.doc.buffer().end());
        self.follow_cursor();
    }

    /// Collapse the selection onto its moving end.
    pub fn select_none(&mut self) {
        self.selection = Selection::caret(self.cursor());
    }

    fn word_selection(&self, at: Cursor) -> Option<Selection> {
        let range = word::word_at(self.doc.buffer().line_text(at.row), at.col)?;
        Some(Selection::new(Cursor::new(at.row, range.start), Cursor::new(at.row, range.end)))
    }

    /// Row `row` plus its line break; the last row ends at its line end.
    fn line_selection(&self, row: usize) -> Selection {
        let buf = self.doc.buffer();
        let end = if row + 1 < buf.line_count() {
            Cursor::new(row + 1, 0)
        } else {
            Cursor::new(row, buf.line_len(row))
        };
        Selection::new(Cursor::new(row, 0), end)
    }

    /// Select the word under `at`. Whitespace or a break character there
    /// leaves a caret at `at` and returns false.
    pub fn select_word_at(&mut self, at: Cursor) -> bool {
        let at = self.doc.buffer().clamp(at);
        self.sticky_col = None;
        match self.word_selection(at) {
            Some(sel) => {
                self.selection = sel;
                self.follow_cursor();
                true
            }
            None => {
                self.place(at, false);
                false
            }
        }
    }

    /// Select the whole row under `at`, including its line break when a next
    /// row exists.
    pub fn select_line_at(&mut self, at: Cursor) {
        let row = self.doc.buffer().clamp(at).row;
        self.sticky_col = None;
        self.selection = self.line_selection(row);
        self.follow_cursor();
    }

    /// Merge `newer` into the current selection: a nested selection leaves the
    /// outer one in place, otherwise both are spanned in `newer`'s direction.
    pub fn extend_selection(&mut self, newer: Selection) {
        let newer = self.clamp_selection(newer);
        self.sticky_col = None;
        self.selection = self.selection.cover(&newer);
        self.follow_cursor();
    }

    /// Word-wise drag: extend the selection over the word under `at`.
    /// Off a word the caret position at `at` is covered instead.
    pub fn extend_word_to(&mut self, at: Cursor) {
        let at = self.doc.buffer().clamp(at);
        let sel = self.word_selection(at).unwrap_or(Selection::caret(at));
        self.extend_selection(self.toward(sel));
    }

    /// Line-wise drag: extend the selection over the row under `at`.
    pub fn extend_line_to(&mut self, at: Cursor) {
        let row = self.doc.buffer().clamp(at).row;
        let sel = self.line_selection(row);
        self.extend_selection(self.toward(sel));
    }

    /// Orient `sel` away from the current anchor.
    fn toward(&self, sel: Selection) -> Selection {
        if sel.min() < self.selection.start {
            Selection::new(sel.max(), sel.min())
        } else {
            Selection::new(sel.min(), sel.max())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorOptions;

    fn editor(lines: &[&str]) -> Editor {
        Editor::from_lines(lines.iter().copied(), EditorOptions::default())
    }

    #[test]
    fn char_motion_collapses_selection() {
        let mut ed = editor(&["abcdef"]);
        ed.move_cursor(Cursor::new(0, 4), false);
        ed.move_cursor(Cursor::new(0, 1), true);
        ed.move_char(Direction::Forward, false);
        assert_eq!(ed.selection(), Selection::caret(Cursor::new(0, 4)));
        ed.move_cursor(Cursor::new(0, 1), true);
        ed.move_char(Direction::Backward, false);
        assert_eq!(ed.selection(), Selection::caret(Cursor::new(0, 1)));
    }

    #[test]
    fn vertical_moves_keep_sticky_column() {
        let mut ed = editor(&["hello world", "ab", "long line here"]);
        ed.move_cursor(Cursor::new(0, 8), false);
        ed.move_line(Direction::Forward, false);
        assert_eq!(ed.cursor(), Cursor::new(1, 2));
        ed.move_line(Direction::Forward, false);
        assert_eq!(ed.cursor(), Cursor::new(2, 8));
        ed.move_char(Direction::Backward, false);
        ed.move_line(Direction::Backward, false);
        assert_eq!(ed.cursor(), Cursor::new(1, 2));
    }

    #[test]
    fn selecting_extends_from_anchor() {
        let mut ed = editor(&["abc", "def"]);
        ed.move_cursor(Cursor::new(0, 1), false);
        ed.move_line_edge(Edge::End, true);
        ed.move_line(Direction::Forward, true);
        assert_eq!(ed.selection().start, Cursor::new(0, 1));
        assert_eq!(ed.selection().end, Cursor::new(1, 3));
        assert_eq!(ed.selected_text(), "bc\ndef");
        assert_eq!(ed.selection_label(), "6 selected (2 lines)");
    }

    #[test]
    fn select_line_at_last_row_stops_at_line_end() {
        let mut ed = editor(&["abc", "de"]);
        ed.select_line_at(Cursor::new(0, 2));
        assert_eq!(ed.selected_text(), "abc\n");
        ed.select_line_at(Cursor::new(9, 0));
        assert_eq!(ed.selection(), Selection::new(Cursor::new(1, 0), Cursor::new(1, 2)));
    }

    #[test]
    fn select_word_at_break_char_is_caret() {
        let mut ed = editor(&["foo(bar)"]);
        assert!(ed.select_word_at(Cursor::new(0, 5)));
        assert_eq!(ed.selected_text(), "bar");
        assert!(!ed.select_word_at(Cursor::new(0, 3)));
        assert!(ed.selection().is_empty());
    }

    #[test]
    fn word_drag_covers_both_words_and_ignores_nested_words() {
        let mut ed = editor(&["foo bar baz"]);
        ed.select_word_at(Cursor::new(0, 5));
        ed.extend_word_to(Cursor::new(0, 9));
        assert_eq!(ed.selection(), Selection::new(Cursor::new(0, 4), Cursor::new(0, 11)));
        ed.extend_word_to(Cursor::new(0, 5));
        assert_eq!(ed.selected_text(), "bar baz");
        ed.extend_word_to(Cursor::new(0, 1));
        assert_eq!(ed.selection(), Selection::new(Cursor::new(0, 11), Cursor::new(0, 0)));
    }

    #[test]
    fn line_drag_upward_is_oriented_backward() {
        let mut ed = editor(&["a", "b", "c", "d"]);
        ed.select_line_at(Cursor::new(2, 0));
        ed.extend_line_to(Cursor::new(0, 0));
        assert_eq!(ed.selection(), Selection::new(Cursor::new(3, 0), Cursor::new(0, 0)));
        assert_eq!(ed.cursor(), Cursor::new(0, 0));
        ed.extend_line_to(Cursor::new(9, 0));
        assert_eq!(ed.selection(), Selection::new(Cursor::new(0, 0), Cursor::new(3, 1)));
    }
}
