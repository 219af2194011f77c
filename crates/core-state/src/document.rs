//! Buffer + per-instance version counter: the only path that mutates text.

use crate::operation::{Operation, TextChange};
use core_text::{Buffer, Cursor, LineDelta};
use tracing::{debug, trace};

/// Monotonic content-generation counter owned by one editor instance.
///
/// Never decremented and never reused: a reload moves to a fresh baseline by
/// bumping rather than resetting.
#[derive(Debug, Default)]
pub struct VersionCounter {
    current: u64,
}

impl VersionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(current: u64) -> Self {
        Self { current }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn bump(&mut self) -> u64 {
        self.current += 1;
        self.current
    }
}

/// Outcome of applying one `TextChange`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Cursor after the last operation (deletion start / insertion end).
    pub cursor: Cursor,
    /// Structural footprint of each operation, in application order.
    pub deltas: Vec<LineDelta>,
    /// Version stamped on every touched line.
    pub version: u64,
}

#[derive(Debug)]
pub struct Document {
    buffer: Buffer,
    version: VersionCounter,
}

impl Document {
    pub fn new(buffer: Buffer, version: VersionCounter) -> Self {
        Self { buffer, version }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn version(&self) -> u64 {
        self.version.current()
    }

    /// Attach highlighter spans (text untouched, version unchanged).
    pub fn set_spans(&mut self, row: usize, spans: Vec<core_text::StyleSpan>) {
        self.buffer.set_spans(row, spans);
    }

    /// Apply every operation in order. The version increments exactly once for
    /// a non-empty change and not at all for an empty one.
    pub fn apply(&mut self, change: &TextChange) -> Option<Applied> {
        if change.is_empty() {
            return None;
        }
        let version = self.version.bump();
        let mut cursor = change.selection_before().end;
        let mut deltas = Vec::with_capacity(change.len());
        for op in change.ops() {
            let (after, delta) = self.apply_op(op, version);
            cursor = after;
            deltas.push(delta);
        }
        debug!(target: "state.document", version, ops = change.len(), lines = self.buffer.line_count(), "change_applied");
        Some(Applied {
            cursor,
            deltas,
            version,
        })
    }

    fn apply_op(&mut self, op: &Operation, version: u64) -> (Cursor, LineDelta) {
        match op {
            Operation::Insertion { cursor, lines } => {
                trace!(target: "state.document", at = %cursor, fragments = lines.len(), "apply_insertion");
                self.buffer.insert(*cursor, lines, version)
            }
            Operation::Deletion { lines, span, .. } => {
                let (from, to) = (span.min(), span.max());
                debug_assert_eq!(
                    &self.buffer.text_in(from, to),
                    lines,
                    "deletion payload does not match buffer content"
                );
                trace!(target: "state.document", from = %from, to = %to, "apply_deletion");
                let (_, delta) = self.buffer.delete(from, to, version);
                (from, delta)
            }
        }
    }

    /// Replace all content and move to a fresh version baseline.
    pub fn reload<I, S>(&mut self, lines: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let version = self.version.bump();
        self.buffer.replace_all(lines, version);
        debug!(target: "state.document", version, lines = self.buffer.line_count(), "document_reloaded");
        version
    }
}
