use core_editor::{Editor, EditorOptions};
use core_search::SearchMode;
use core_text::Cursor;
use proptest::prelude::*;

/// Line content with ASCII and non-ASCII spaces plus comment-token characters.
const LINE: &str = "[a-d é/\t\u{a0}\u{3000}]{0,8}";

#[derive(Debug, Clone, Copy)]
enum LineOp {
    Indent,
    Outdent,
    Comment,
    DuplicateLine,
    DuplicateSelection,
    Up,
    Down,
}

#[derive(Debug, Clone)]
enum Step {
    Insert { row: usize, col: usize, text: String },
    Delete { a: (usize, usize), b: (usize, usize) },
    Backspace { row: usize, col: usize },
    LineWise { a: (usize, usize), b: (usize, usize), op: LineOp },
    ReplaceAll { pattern: String, with: String },
    Commit,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..6usize, 0..12usize, "[a-c\n é]{0,5}").prop_map(|(row, col, text)| Step::Insert { row, col, text }),
        ((0..6usize, 0..12usize), (0..6usize, 0..12usize)).prop_map(|(a, b)| Step::Delete { a, b }),
        (0..6usize, 0..12usize).prop_map(|(row, col)| Step::Backspace { row, col }),
        ((0..6usize, 0..12usize), (0..6usize, 0..12usize), line_op())
            .prop_map(|(a, b, op)| Step::LineWise { a, b, op }),
        ("[a-c/]{1,2}", "[a-c\u{a0}]{0,2}").prop_map(|(pattern, with)| Step::ReplaceAll { pattern, with }),
        Just(Step::Commit),
    ]
}

fn line_op() -> impl Strategy<Value = LineOp> {
    prop_oneof![
        Just(LineOp::Indent),
        Just(LineOp::Outdent),
        Just(LineOp::Comment),
        Just(LineOp::DuplicateLine),
        Just(LineOp::DuplicateSelection),
        Just(LineOp::Up),
        Just(LineOp::Down),
    ]
}

fn at(ed: &Editor, (row, col): (usize, usize)) -> Cursor {
    ed.buffer().clamp(Cursor::new(row, col))
}

fn run(ed: &mut Editor, steps: &[Step]) -> usize {
    let mut applied = 0;
    for s in steps {
        let changed = match s {
            Step::Insert { row, col, text } => {
                let c = at(ed, (*row, *col));
                ed.move_cursor(c, false);
                ed.insert_text(text)
            }
            Step::Delete { a, b } => {
                let (a, b) = (at(ed, *a), at(ed, *b));
                ed.move_cursor(a, false);
                ed.move_cursor(b, true);
                ed.delete_selection()
            }
            Step::Backspace { row, col } => {
                let c = at(ed, (*row, *col));
                ed.move_cursor(c, false);
                ed.backspace()
            }
            Step::LineWise { a, b, op } => {
                let (a, b) = (at(ed, *a), at(ed, *b));
                ed.move_cursor(a, false);
                ed.move_cursor(b, true);
                match op {
                    LineOp::Indent => ed.indent(),
                    LineOp::Outdent => ed.outdent(),
                    LineOp::Comment => ed.toggle_comment(),
                    LineOp::DuplicateLine => ed.duplicate_line(),
                    LineOp::DuplicateSelection => ed.duplicate_selection(),
                    LineOp::Up => ed.reorder_line_up(),
                    LineOp::Down => ed.reorder_line_down(),
                }
            }
            Step::ReplaceAll { pattern, with } => {
                let found = ed.find(pattern, true, SearchMode::Literal).unwrap_or(0);
                found > 0 && ed.replace_all(with)
            }
            Step::Commit => {
                ed.focus_lost();
                false
            }
        };
        if changed {
            applied += 1;
        }
    }
    applied
}

proptest! {
    #[test]
    fn undo_everything_restores_original(
        lines in proptest::collection::vec(LINE, 1..5),
        steps in proptest::collection::vec(step(), 0..24),
    ) {
        let mut ed = Editor::from_lines(lines.clone(), EditorOptions::default());
        let v0 = ed.version();
        let applied = run(&mut ed, &steps);
        prop_assert_eq!(ed.version(), v0 + applied as u64);
        let after = ed.lines();
        while ed.undo() {}
        prop_assert_eq!(ed.lines(), lines);
        while ed.redo() {}
        prop_assert_eq!(ed.lines(), after);
        prop_assert_eq!(ed.layout_cache().len(), ed.line_count());
    }

    #[test]
    fn selection_bounds_stay_ordered_and_valid(
        lines in proptest::collection::vec("[a-d ]{0,8}", 1..5),
        a in (0..8usize, 0..12usize),
        b in (0..8usize, 0..12usize),
    ) {
        let mut ed = Editor::from_lines(lines, EditorOptions::default());
        ed.move_cursor(Cursor::new(a.0, a.1), false);
        ed.move_cursor(Cursor::new(b.0, b.1), true);
        let sel = ed.selection();
        prop_assert!(sel.min() <= sel.max());
        prop_assert!(ed.buffer().is_valid(sel.start));
        prop_assert!(ed.buffer().is_valid(sel.end));
    }

    #[test]
    // Rows are non-empty: a block whose last row is empty and lands on the
    // bottom row cannot be told apart from a col-0 end that excludes it.
    fn reorder_down_then_up_restores_lines(
        lines in proptest::collection::vec("[a-d é/\t\u{a0}\u{3000}]{1,8}", 2..6),
        a in (0..6usize, 0..10usize),
        b in (0..6usize, 0..10usize),
    ) {
        let mut ed = Editor::from_lines(lines.clone(), EditorOptions::default());
        let (a, b) = (at(&ed, a), at(&ed, b));
        ed.move_cursor(a, false);
        ed.move_cursor(b, true);
        if ed.reorder_line_down() {
            prop_assert!(ed.buffer().is_valid(ed.selection().start));
            prop_assert!(ed.buffer().is_valid(ed.selection().end));
            prop_assert!(ed.reorder_line_up());
            prop_assert_eq!(ed.lines(), lines);
        }
    }

    #[test]
    fn comment_toggle_twice_restores_uniform_lines(
        indent in "[ \t\u{a0}\u{3000}]{0,3}",
        bodies in proptest::collection::vec("[a-d]{1,4}", 1..4),
    ) {
        let lines: Vec<String> = bodies.iter().map(|b| format!("{indent}{b}")).collect();
        let mut ed = Editor::from_lines(lines.clone(), EditorOptions::default());
        ed.select_all();
        prop_assert!(ed.toggle_comment());
        prop_assert!(ed.toggle_comment());
        prop_assert_eq!(ed.lines(), lines);
    }
}
