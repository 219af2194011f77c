//! Atomic edit operations and their grouping into undoable `TextChange`s.
//!
//! Every operation is self-invertible: an `Insertion` inverts to a `Deletion`
//! with identical cursor and fragments, and vice versa. A deletion carries the
//! exact span it removes, computed once at construction, so inversion never
//! has to re-derive geometry from partial data.

use core_text::buffer::{fragments_end, split_fragments};
use core_text::{Buffer, Cursor, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert `lines` (fragments of a possibly multi-line text) at `cursor`.
    Insertion { cursor: Cursor, lines: Vec<String> },
    /// Remove `lines`' worth of content starting at `cursor`. `span` is the
    /// exact forward range removed.
    Deletion {
        cursor: Cursor,
        lines: Vec<String>,
        span: Selection,
    },
}

impl Operation {
    pub fn insertion(cursor: Cursor, lines: Vec<String>) -> Self {
        debug_assert!(!lines.is_empty(), "operation needs at least one fragment");
        Operation::Insertion { cursor, lines }
    }

    pub fn deletion(cursor: Cursor, lines: Vec<String>) -> Self {
        debug_assert!(!lines.is_empty(), "operation needs at least one fragment");
        let span = Selection::new(cursor, fragments_end(cursor, &lines));
        Operation::Deletion {
            cursor,
            lines,
            span,
        }
    }

    /// Insertion of raw text (split on `\n`).
    pub fn insert_text(cursor: Cursor, text: &str) -> Self {
        Self::insertion(cursor, split_fragments(text))
    }

    /// Deletion of whatever `buffer` currently holds inside `range`.
    pub fn delete_range(buffer: &Buffer, range: Selection) -> Self {
        let (from, to) = (range.min(), range.max());
        Self::deletion(from, buffer.text_in(from, to))
    }

    pub fn cursor(&self) -> Cursor {
        match self {
            Operation::Insertion { cursor, .. } | Operation::Deletion { cursor, .. } => *cursor,
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            Operation::Insertion { lines, .. } | Operation::Deletion { lines, .. } => lines,
        }
    }

    /// Position right after the operation's text.
    pub fn end(&self) -> Cursor {
        fragments_end(self.cursor(), self.lines())
    }

    /// True when applying the operation would not change the buffer.
    pub fn is_noop(&self) -> bool {
        matches!(self.lines(), [only] if only.is_empty())
    }

    pub fn invert(&self) -> Operation {
        match self {
            Operation::Insertion { cursor, lines } => Operation::deletion(*cursor, lines.clone()),
            Operation::Deletion { cursor, lines, .. } => Operation::Insertion {
                cursor: *cursor,
                lines: lines.clone(),
            },
        }
    }

    /// Number of bytes of text carried (line breaks count as one).
    pub fn text_len(&self) -> usize {
        let lines = self.lines();
        lines.iter().map(String::len).sum::<usize>() + lines.len() - 1
    }
}

/// Ordered operations applied as one atomic unit, plus the selection that was
/// live just before the first operation (restored on undo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    ops: Vec<Operation>,
    selection_before: Selection,
}

impl TextChange {
    pub fn new(ops: Vec<Operation>, selection_before: Selection) -> Self {
        Self {
            ops: ops.into_iter().filter(|op| !op.is_noop()).collect(),
            selection_before,
        }
    }

    pub fn single(op: Operation, selection_before: Selection) -> Self {
        Self::new(vec![op], selection_before)
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn selection_before(&self) -> Selection {
        self.selection_before
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Operations reversed, each inverted. The recorded selection is kept so an
    /// undo-of-undo still knows where the edit started.
    pub fn invert(&self) -> TextChange {
        TextChange {
            ops: self.ops.iter().rev().map(Operation::invert).collect(),
            selection_before: self.selection_before,
        }
    }

    /// Flatten a burst of changes into one unit; the earliest recorded
    /// selection wins. Returns `None` for an empty burst.
    pub fn merge<I>(changes: I) -> Option<TextChange>
    where
        I: IntoIterator<Item = TextChange>,
    {
        let mut iter = changes.into_iter();
        let mut merged = iter.next()?;
        for change in iter {
            merged.ops.extend(change.ops);
        }
        Some(merged)
    }
}
