//! Document buffer: an ordered, never-empty vector of styled lines.
//!
//! Lines are replaced wholesale on edit. Each line remembers the version at
//! which its text last changed (`revision`) so observers can validate cached
//! derived data by index + revision instead of holding references.
//!
//! Every structural mutation reports a `LineDelta` describing which rows were
//! edited in place, inserted, or removed. Edits that are line-aligned (whole
//! lines inserted before a row, or whole lines removed) leave the surviving
//! neighbor untouched so its revision and spans carry over.

use crate::{Cursor, grapheme};
use std::ops::Range;
use tracing::trace;

/// Highlight class attached to a byte range of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Plain,
    Keyword,
    Type,
    String,
    Number,
    Comment,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleSpan {
    pub range: Range<usize>,
    pub style: Style,
}

impl StyleSpan {
    pub fn new(range: Range<usize>, style: Style) -> Self {
        Self { range, style }
    }
}

/// Highlighter output for one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

impl StyledLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
    spans: Vec<StyleSpan>,
    revision: u64,
}

impl Line {
    pub fn new(text: impl Into<String>, revision: u64) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
            revision,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[StyleSpan] {
        &self.spans
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn replace_text(&mut self, text: String, revision: u64) {
        self.text = text;
        self.spans.clear();
        self.revision = revision;
    }
}

// Revision is bookkeeping for cache validation, not content: two lines are
// equal when their text and styling are.
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.spans == other.spans
    }
}

impl Eq for Line {}

/// Structural footprint of a single buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDelta {
    /// One row edited in place; line count unchanged.
    Changed(usize),
    /// `rows` (post-edit indices) are new; `changed` was edited in place.
    Inserted {
        changed: Option<usize>,
        rows: Range<usize>,
    },
    /// `rows` (pre-edit indices) are gone; `changed` was edited in place.
    Removed {
        changed: Option<usize>,
        rows: Range<usize>,
    },
}

impl LineDelta {
    /// Row edited in place, if any.
    pub fn changed_row(&self) -> Option<usize> {
        match self {
            LineDelta::Changed(row) => Some(*row),
            LineDelta::Inserted { changed, .. } | LineDelta::Removed { changed, .. } => *changed,
        }
    }
}

/// Split raw text into line fragments on `\n`. Always yields at least one fragment.
pub fn split_fragments(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_owned).collect()
}

/// Position right after `fragments` once inserted at `at`.
pub fn fragments_end(at: Cursor, fragments: &[String]) -> Cursor {
    match fragments {
        [] => at,
        [only] => Cursor::new(at.row, at.col + only.len()),
        [.., last] => Cursor::new(at.row + fragments.len() - 1, last.len()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<Line>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A buffer holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new("", 0)],
        }
    }

    /// Build from raw line texts (no embedded newlines expected). An empty
    /// iterator still yields one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<Line> = lines.into_iter().map(|s| Line::new(s, 0)).collect();
        if out.is_empty() {
            out.push(Line::new("", 0));
        }
        debug_assert!(out.iter().all(|l| !l.text.contains('\n')));
        Self { lines: out }
    }

    /// Build from a text blob, splitting on `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_fragments(text))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Text of a line; empty for out-of-range rows.
    pub fn line_text(&self, idx: usize) -> &str {
        self.lines.get(idx).map(Line::text).unwrap_or("")
    }

    /// Byte length of a line; 0 for out-of-range rows.
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(Line::len).unwrap_or(0)
    }

    /// Revision stamp of a line; 0 for out-of-range rows.
    pub fn line_revision(&self, idx: usize) -> u64 {
        self.lines.get(idx).map(Line::revision).unwrap_or(0)
    }

    /// Owned copy of every line's text.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    /// Last valid position in the buffer.
    pub fn end(&self) -> Cursor {
        let row = self.lines.len() - 1;
        Cursor::new(row, self.lines[row].len())
    }

    /// Clamp into bounds and snap the column onto a grapheme boundary.
    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        let mut c = cursor.clamped(self.lines.len(), |r| self.line_len(r));
        c.col = grapheme::floor_boundary(self.line_text(c.row), c.col);
        c
    }

    pub fn is_valid(&self, cursor: Cursor) -> bool {
        cursor.row < self.lines.len()
            && cursor.col <= self.lines[cursor.row].len()
            && self.lines[cursor.row].text.is_char_boundary(cursor.col)
    }

    /// Entire content joined by `\n`.
    pub fn flatten(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }

    /// Text between two positions as line fragments (`[from, to)`, ordered).
    pub fn text_in(&self, from: Cursor, to: Cursor) -> Vec<String> {
        let (a, b) = (from.min(to), from.max(to));
        debug_assert!(self.is_valid(a) && self.is_valid(b), "range outside buffer");
        if a.row == b.row {
            return vec![self.lines[a.row].text[a.col..b.col].to_owned()];
        }
        let mut out = Vec::with_capacity(b.row - a.row + 1);
        out.push(self.lines[a.row].text[a.col..].to_owned());
        for row in a.row + 1..b.row {
            out.push(self.lines[row].text.clone());
        }
        out.push(self.lines[b.row].text[..b.col].to_owned());
        out
    }

    /// Insert `fragments` at `at`, stamping touched lines with `revision`.
    /// Returns the position right after the inserted text.
    pub fn insert(&mut self, at: Cursor, fragments: &[String], revision: u64) -> (Cursor, LineDelta) {
        assert!(self.is_valid(at), "insert outside buffer at {at}");
        assert!(!fragments.is_empty(), "insert requires at least one fragment");
        let end = fragments_end(at, fragments);
        let k = fragments.len();
        let row = at.row;
        if k == 1 {
            let line = &mut self.lines[row];
            let mut text = String::with_capacity(line.len() + fragments[0].len());
            text.push_str(&line.text[..at.col]);
            text.push_str(&fragments[0]);
            text.push_str(&line.text[at.col..]);
            line.replace_text(text, revision);
            trace!(target: "text.buffer", row, bytes = fragments[0].len(), "insert_inline");
            return (end, LineDelta::Changed(row));
        }

        let line_len = self.lines[row].len();
        let delta = if at.col == 0 && fragments[k - 1].is_empty() {
            // Whole lines slotted in before `row`; the old row survives untouched.
            let new_lines = fragments[..k - 1].iter().map(|f| Line::new(f.clone(), revision));
            self.lines.splice(row..row, new_lines);
            LineDelta::Inserted {
                changed: None,
                rows: row..row + k - 1,
            }
        } else if at.col == line_len && fragments[0].is_empty() {
            // Whole lines appended after `row`.
            let new_lines = fragments[1..].iter().map(|f| Line::new(f.clone(), revision));
            self.lines.splice(row + 1..row + 1, new_lines);
            LineDelta::Inserted {
                changed: None,
                rows: row + 1..row + k,
            }
        } else {
            let suffix = self.lines[row].text[at.col..].to_owned();
            let mut head = self.lines[row].text[..at.col].to_owned();
            head.push_str(&fragments[0]);
            self.lines[row].replace_text(head, revision);
            let mut tail = fragments[k - 1].clone();
            tail.push_str(&suffix);
            let new_lines = fragments[1..k - 1]
                .iter()
                .cloned()
                .chain(std::iter::once(tail))
                .map(|t| Line::new(t, revision));
            self.lines.splice(row + 1..row + 1, new_lines);
            LineDelta::Inserted {
                changed: Some(row),
                rows: row + 1..row + k,
            }
        };
        trace!(target: "text.buffer", row, fragments = k, lines = self.lines.len(), "insert_multiline");
        (end, delta)
    }

    /// Remove `[from, to)` (ordered), stamping the edited line with `revision`.
    /// Returns the removed text as fragments.
    pub fn delete(&mut self, from: Cursor, to: Cursor, revision: u64) -> (Vec<String>, LineDelta) {
        let (a, b) = (from.min(to), from.max(to));
        assert!(self.is_valid(a) && self.is_valid(b), "delete outside buffer {a}..{b}");
        let removed = self.text_in(a, b);
        if a.row == b.row {
            let line = &mut self.lines[a.row];
            let mut text = String::with_capacity(line.len() - (b.col - a.col));
            text.push_str(&line.text[..a.col]);
            text.push_str(&line.text[b.col..]);
            line.replace_text(text, revision);
            trace!(target: "text.buffer", row = a.row, bytes = b.col - a.col, "delete_inline");
            return (removed, LineDelta::Changed(a.row));
        }

        let delta = if a.col == 0 && b.col == 0 {
            self.lines.drain(a.row..b.row);
            LineDelta::Removed {
                changed: None,
                rows: a.row..b.row,
            }
        } else if a.col == self.lines[a.row].len() && b.col == self.lines[b.row].len() {
            self.lines.drain(a.row + 1..b.row + 1);
            LineDelta::Removed {
                changed: None,
                rows: a.row + 1..b.row + 1,
            }
        } else {
            let mut joined = self.lines[a.row].text[..a.col].to_owned();
            joined.push_str(&self.lines[b.row].text[b.col..]);
            self.lines[a.row].replace_text(joined, revision);
            self.lines.drain(a.row + 1..b.row + 1);
            LineDelta::Removed {
                changed: Some(a.row),
                rows: a.row + 1..b.row + 1,
            }
        };
        debug_assert!(!self.lines.is_empty(), "buffer must never be empty");
        trace!(target: "text.buffer", from = %a, to = %b, lines = self.lines.len(), "delete_multiline");
        (removed, delta)
    }

    /// Attach highlighter output to a line whose text is unchanged.
    pub fn set_spans(&mut self, idx: usize, spans: Vec<StyleSpan>) {
        if let Some(line) = self.lines.get_mut(idx) {
            line.spans = spans;
        }
    }

    /// Replace all content (used on reload). Empty input yields one empty line.
    pub fn replace_all<I, S>(&mut self, lines: I, revision: u64)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fresh = Buffer::from_lines(lines);
        for line in &mut fresh.lines {
            line.revision = revision;
        }
        *self = fresh;
    }
}
