//! Content mutators. Each one builds operations against the current buffer and
//! hands them to `Editor::apply_edit`; every mutator returns whether the
//! buffer changed.

use std::ops::RangeInclusive;

use core_state::{HistoryStep, Operation};
use core_text::buffer::fragments_end;
use core_text::{Cursor, Selection, grapheme, motion};
use tracing::trace;

use crate::editor::Editor;

/// Byte length of the leading whitespace, any Unicode whitespace included.
fn leading_ws(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Move both selection ends one row with the block. An end pushed past the
/// last row lands on `tail` instead.
fn shift_rows(sel: Selection, down: bool, line_count: usize, tail: Cursor) -> Selection {
    let shift = |c: Cursor| {
        let row = if down { c.row + 1 } else { c.row.saturating_sub(1) };
        if row >= line_count { tail } else { Cursor::new(row, c.col) }
    };
    Selection::new(shift(sel.start), shift(sel.end))
}

impl Editor {
    /// Rows a line-wise command acts on. A multi-row selection ending at
    /// column 0 leaves that last row out.
    pub(crate) fn line_block(&self) -> RangeInclusive<usize> {
        let (min, max) = (self.selection.min(), self.selection.max());
        let last = if max.row > min.row && max.col == 0 { max.row - 1 } else { max.row };
        min.row..=last
    }

    /// Move every selection endpoint on row `row` at or after `from` by `delta` bytes.
    fn shift_cols(sel: Selection, row: usize, from: usize, delta: isize) -> Selection {
        let shift = |c: Cursor| {
            if c.row != row || c.col < from {
                return c;
            }
            let col = if delta >= 0 {
                c.col + delta.unsigned_abs()
            } else {
                c.col.saturating_sub(delta.unsigned_abs()).max(from)
            };
            Cursor::new(c.row, col)
        };
        Selection::new(shift(sel.start), shift(sel.end))
    }

    /// Insert `text` at the cursor, replacing the selection if there is one.
    /// `\r\n` and lone `\r` are stored as line breaks.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let sel = self.selection;
        let mut ops = Vec::with_capacity(2);
        if !sel.is_empty() {
            ops.push(Operation::delete_range(self.doc.buffer(), sel));
        }
        if !text.is_empty() {
            ops.push(Operation::insert_text(sel.min(), &text));
        }
        if ops.is_empty() {
            return false;
        }
        self.apply_edit(ops, None)
    }

    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let op = Operation::delete_range(self.doc.buffer(), self.selection);
        self.apply_edit(vec![op], None)
    }

    /// Delete the selection, or the grapheme (or line break) before the cursor.
    pub fn backspace(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let to = self.cursor();
        let from = motion::left(self.doc.buffer(), to);
        if from == to {
            return false;
        }
        let op = Operation::delete_range(self.doc.buffer(), Selection::new(from, to));
        self.apply_edit(vec![op], None)
    }

    /// Delete the selection, or the grapheme (or line break) after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let from = self.cursor();
        let to = motion::right(self.doc.buffer(), from);
        if from == to {
            return false;
        }
        let op = Operation::delete_range(self.doc.buffer(), Selection::new(from, to));
        self.apply_edit(vec![op], None)
    }

    /// Prefix every row of the line block with one indent unit.
    pub fn indent(&mut self) -> bool {
        let unit = self.options.indent_unit.clone();
        let mut sel = self.selection;
        let mut ops = Vec::new();
        for row in self.line_block() {
            ops.push(Operation::insert_text(Cursor::new(row, 0), &unit));
            sel = Self::shift_cols(sel, row, 0, unit.len() as isize);
        }
        self.apply_edit(ops, Some(sel))
    }

    /// Strip one leading tab, or up to `indent_width` leading spaces, per row.
    pub fn outdent(&mut self) -> bool {
        let width = self.options.indent_width;
        let mut sel = self.selection;
        let mut ops = Vec::new();
        for row in self.line_block() {
            let line = self.doc.buffer().line_text(row);
            let n = if line.starts_with('\t') {
                1
            } else {
                line.bytes().take(width).take_while(|b| *b == b' ').count()
            };
            if n == 0 {
                continue;
            }
            ops.push(Operation::deletion(Cursor::new(row, 0), vec![line[..n].to_owned()]));
            sel = Self::shift_cols(sel, row, 0, -(n as isize));
        }
        if ops.is_empty() {
            return false;
        }
        self.apply_edit(ops, Some(sel))
    }

    /// Comment out the line block with the configured token, or uncomment it
    /// when every non-blank row already carries the token.
    pub fn toggle_comment(&mut self) -> bool {
        let token = self.options.comment_token.clone();
        let buf = self.doc.buffer();
        let rows: Vec<usize> = self
            .line_block()
            .filter(|r| !buf.line_text(*r).trim().is_empty())
            .collect();
        if rows.is_empty() || token.is_empty() {
            return false;
        }
        let commented = rows
            .iter()
            .all(|r| {
                let line = buf.line_text(*r);
                line[leading_ws(line)..].starts_with(token.as_str())
            });
        let mut sel = self.selection;
        let mut ops = Vec::with_capacity(rows.len());
        if commented {
            for &row in &rows {
                let line = buf.line_text(row);
                let at = leading_ws(line);
                let mut end = at + token.len();
                if line[end..].starts_with(' ') {
                    end += 1;
                }
                ops.push(Operation::deletion(Cursor::new(row, at), vec![line[at..end].to_owned()]));
                sel = Self::shift_cols(sel, row, at, -((end - at) as isize));
            }
        } else {
            let at = rows
                .iter()
                .map(|r| leading_ws(buf.line_text(*r)))
                .min()
                .unwrap_or(0);
            let prefix = format!("{token} ");
            for &row in &rows {
                // Mixed indentation can put `at` inside another row's multi-byte space.
                let col = grapheme::floor_boundary(buf.line_text(row), at);
                ops.push(Operation::insert_text(Cursor::new(row, col), &prefix));
                sel = Self::shift_cols(sel, row, col, prefix.len() as isize);
            }
        }
        trace!(target: "editor", rows = rows.len(), uncomment = commented, "toggle_comment");
        self.apply_edit(ops, Some(sel))
    }

    /// Copy the line block below itself; the selection follows the copy.
    pub fn duplicate_line(&mut self) -> bool {
        let block = self.line_block();
        let (first, last) = (*block.start(), *block.end());
        let buf = self.doc.buffer();
        let mut lines = vec![String::new()];
        lines.extend((first..=last).map(|r| buf.line_text(r).to_owned()));
        let at = Cursor::new(last, buf.line_len(last));
        let count = last - first + 1;
        let sel = self.selection;
        let moved = Selection::new(
            Cursor::new(sel.start.row + count, sel.start.col),
            Cursor::new(sel.end.row + count, sel.end.col),
        );
        self.apply_edit(vec![Operation::insertion(at, lines)], Some(moved))
    }

    /// Insert a copy of the selection right after it and select the copy.
    /// Without a selection this duplicates the current line.
    pub fn duplicate_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return self.duplicate_line();
        }
        let (min, max) = (self.selection.min(), self.selection.max());
        let lines = self.doc.buffer().text_in(min, max);
        let end = fragments_end(max, &lines);
        self.apply_edit(vec![Operation::insertion(max, lines)], Some(Selection::new(max, end)))
    }

    /// Swap the line block with the row above it.
    pub fn reorder_line_up(&mut self) -> bool {
        let block = self.line_block();
        let (first, last) = (*block.start(), *block.end());
        if first == 0 {
            return false;
        }
        let buf = self.doc.buffer();
        let above = buf.line_text(first - 1).to_owned();
        let last_len = buf.line_len(last);
        let ops = vec![
            Operation::deletion(Cursor::new(first - 1, 0), vec![above.clone(), String::new()]),
            Operation::insertion(Cursor::new(last - 1, last_len), vec![String::new(), above]),
        ];
        let sel = shift_rows(self.selection, false, buf.line_count(), Cursor::new(last - 1, last_len));
        self.apply_edit(ops, Some(sel))
    }

    /// Swap the line block with the row below it.
    pub fn reorder_line_down(&mut self) -> bool {
        let block = self.line_block();
        let (first, last) = (*block.start(), *block.end());
        let buf = self.doc.buffer();
        if last + 1 >= buf.line_count() {
            return false;
        }
        let below = buf.line_text(last + 1).to_owned();
        let tail = Cursor::new(last + 1, buf.line_len(last));
        let sel = shift_rows(self.selection, true, buf.line_count(), tail);
        let ops = vec![
            Operation::deletion(Cursor::new(last, buf.line_len(last)), vec![String::new(), below.clone()]),
            Operation::insertion(Cursor::new(first, 0), vec![below, String::new()]),
        ];
        self.apply_edit(ops, Some(sel))
    }

    /// Commit any pending burst, then revert the newest undo unit and restore
    /// the selection recorded before it.
    pub fn undo(&mut self) -> bool {
        if !self.writable() {
            return false;
        }
        self.flush();
        let Some(step) = self.history.undo(&mut self.doc) else {
            return false;
        };
        self.restore(step)
    }

    pub fn redo(&mut self) -> bool {
        if !self.writable() {
            return false;
        }
        self.flush();
        let Some(step) = self.history.redo(&mut self.doc) else {
            return false;
        };
        self.restore(step)
    }

    fn restore(&mut self, step: HistoryStep) -> bool {
        self.mirror(&step.applied);
        self.selection = self.clamp_selection(step.selection);
        self.sticky_col = None;
        self.rehighlight();
        self.follow_cursor();
        true
    }

    /// Put the selected text on the clipboard. Returns false for an empty selection.
    pub fn copy(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let text = self.selected_text();
        trace!(target: "editor", len = text.len(), "copy");
        self.clipboard.set_text(text);
        true
    }

    pub fn cut(&mut self) -> bool {
        if self.selection.is_empty() || !self.writable() {
            return false;
        }
        self.copy();
        self.delete_selection()
    }

    pub fn paste(&mut self) -> bool {
        match self.clipboard.get_text() {
            Some(text) => self.insert_text(&text),
            None => false,
        }
    }
}
