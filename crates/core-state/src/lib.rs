//! Edit state: the operation log, the versioned document it mutates, and the
//! debounced undo/redo history.

pub mod clock;
pub mod document;
pub mod line_ending;
pub mod operation;
pub mod undo;

pub use clock::{Clock, DebounceTimer, ManualClock, SystemClock};
pub use document::{Applied, Document, VersionCounter};
pub use line_ending::{LineEnding, NormalizedText, denormalize, normalize_line_endings};
pub use operation::{Operation, TextChange};
pub use undo::{DEBOUNCE_WINDOW, HistoryStep, UNDO_HISTORY_MAX, UndoEngine};

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Cursor, Selection};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Edit {
        Insert { row: usize, col: usize, text: String },
        Delete { a: (usize, usize), b: (usize, usize) },
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (0usize..6, 0usize..12, "[a-cé\n]{0,6}").prop_map(|(row, col, text)| Edit::Insert { row, col, text }),
            ((0usize..6, 0usize..12), (0usize..6, 0usize..12)).prop_map(|(a, b)| Edit::Delete { a, b }),
        ]
    }

    fn build(doc: &Document, edits: &[Edit]) -> TextChange {
        // Each op is built against a scratch copy so later ops see earlier ones.
        let mut scratch = Document::new(doc.buffer().clone(), VersionCounter::new());
        let mut ops = Vec::new();
        for e in edits {
            let buf = scratch.buffer();
            let op = match e {
                Edit::Insert { row, col, text } => {
                    Operation::insert_text(buf.clamp(Cursor::new(*row, *col)), text)
                }
                Edit::Delete { a, b } => {
                    let a = buf.clamp(Cursor::new(a.0, a.1));
                    let b = buf.clamp(Cursor::new(b.0, b.1));
                    Operation::delete_range(buf, Selection::new(a, b))
                }
            };
            scratch.apply(&TextChange::single(op.clone(), Selection::default()));
            ops.push(op);
        }
        TextChange::new(ops, Selection::default())
    }

    proptest! {
        #[test]
        fn inverse_restores_exact_content(
            lines in proptest::collection::vec("[a-cé ]{0,8}", 1..5),
            edits in proptest::collection::vec(edit(), 1..6),
        ) {
            let mut doc = Document::new(Buffer::from_lines(lines.iter().map(String::as_str)), VersionCounter::new());
            let before = doc.buffer().texts();
            let change = build(&doc, &edits);
            doc.apply(&change);
            doc.apply(&change.invert());
            prop_assert_eq!(doc.buffer().texts(), before);
        }

        #[test]
        fn version_counts_applied_changes_only(n in 0usize..8) {
            let mut doc = Document::new(Buffer::from_lines(["x"]), VersionCounter::new());
            for i in 0..n {
                let change = if i % 2 == 0 {
                    TextChange::single(Operation::insert_text(Cursor::origin(), "y"), Selection::default())
                } else {
                    TextChange::new(Vec::new(), Selection::default())
                };
                doc.apply(&change);
            }
            prop_assert_eq!(doc.version(), n.div_ceil(2) as u64);
        }
    }
}
