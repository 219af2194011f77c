//! Dispatch of decoded `EditCommand`s onto editor operations.

use core_events::EditCommand;
use core_search::FindError;
use tracing::trace;

use crate::editor::Editor;

impl Editor {
    /// Run one command. Returns whether the buffer or the selection changed
    /// in a way the command reports (mutators: content changed; finder
    /// navigation: a match was selected; motions always report true).
    pub fn execute(&mut self, cmd: EditCommand) -> Result<bool, FindError> {
        trace!(target: "editor", ?cmd, "execute");
        let changed = match cmd {
            EditCommand::InsertText(text) => self.insert_text(&text),
            EditCommand::DeleteSelection => self.delete_selection(),
            EditCommand::Backspace => self.backspace(),
            EditCommand::DeleteForward => self.delete_forward(),
            EditCommand::Indent => self.indent(),
            EditCommand::Outdent => self.outdent(),
            EditCommand::ToggleComment => self.toggle_comment(),
            EditCommand::DuplicateLine => self.duplicate_line(),
            EditCommand::DuplicateSelection => self.duplicate_selection(),
            EditCommand::ReorderLineUp => self.reorder_line_up(),
            EditCommand::ReorderLineDown => self.reorder_line_down(),
            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),
            EditCommand::Copy => self.copy(),
            EditCommand::Cut => self.cut(),
            EditCommand::Paste => self.paste(),
            EditCommand::MoveTo { to, selecting } => {
                self.move_cursor(to, selecting);
                true
            }
            EditCommand::MoveChar { dir, selecting } => {
                self.move_char(dir, selecting);
                true
            }
            EditCommand::MoveWord { dir, selecting } => {
                self.move_word(dir, selecting);
                true
            }
            EditCommand::MoveParagraph { dir, selecting } => {
                self.move_paragraph(dir, selecting);
                true
            }
            EditCommand::MoveLine { dir, selecting } => {
                self.move_line(dir, selecting);
                true
            }
            EditCommand::MovePage { dir, selecting } => {
                self.move_page(dir, selecting);
                true
            }
            EditCommand::MoveLineEdge { edge, selecting } => {
                self.move_line_edge(edge, selecting);
                true
            }
            EditCommand::MoveDocumentEdge { edge, selecting } => {
                self.move_document_edge(edge, selecting);
                true
            }
            EditCommand::SelectAll => {
                self.select_all();
                true
            }
            EditCommand::SelectNone => {
                self.select_none();
                true
            }
            EditCommand::SelectWordAt(at) => self.select_word_at(at),
            EditCommand::SelectLineAt(at) => {
                self.select_line_at(at);
                true
            }
            EditCommand::ExtendWordTo(at) => {
                self.extend_word_to(at);
                true
            }
            EditCommand::ExtendLineTo(at) => {
                self.extend_line_to(at);
                true
            }
            EditCommand::Find {
                pattern,
                case_sensitive,
                mode,
            } => self.find(&pattern, case_sensitive, mode)? > 0,
            EditCommand::FindNext => self.find_next(),
            EditCommand::FindPrevious => self.find_previous(),
            EditCommand::ClearFind => {
                self.clear_find();
                true
            }
            EditCommand::ReplaceCurrent(text) => self.replace_current(&text),
            EditCommand::ReplaceAll(text) => self.replace_all(&text),
            EditCommand::FocusLost => self.focus_lost(),
            EditCommand::ClearHistory => {
                self.clear_history();
                true
            }
        };
        Ok(changed)
    }
}
