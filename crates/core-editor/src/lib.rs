//! Inkwell's editing engine facade.
//!
//! `Editor` ties the layers together: `core-text` buffer and motions,
//! `core-state` operations and debounced history, `core-render` layout cache and
//! viewport, and `core-search` finder. Hosts supply collaborators from
//! `core-events` (source, highlighter, clipboard, viewport, notifiers) and call
//! `tick` on a schedule so debounced edits get committed.

mod command;
mod edit_ops;
pub mod editor;
pub mod file_source;
mod find;
mod navigation;
pub mod options;

pub use editor::Editor;
pub use file_source::FileSource;
pub use options::EditorOptions;
