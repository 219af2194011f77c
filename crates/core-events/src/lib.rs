//! Event types, collaborator interfaces, and async event sources for Inkwell.
//!
//! Three kinds of traffic cross the engine boundary:
//! - `Event`: what the host's loop consumes (decoded commands, ticks, resizes, shutdown).
//! - `EditCommand`: the decoder's output; one variant per engine operation.
//! - `EditorEvent`: what the engine reports back to `Notifier`s.

use std::ops::RangeInclusive;

use core_search::SearchMode;
use core_text::Cursor;
use core_text::motion::Direction;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub mod collab;

pub use collab::{
    Clipboard, DocumentSource, FixedViewport, Highlighter, MemoryClipboard, MemorySource, Notifier,
    PlainHighlighter, RecordingNotifier, ViewportHost,
};

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The host loop reads a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers (script
// reader, tick source) await on a full channel rather than dropping events: an edit command must
// never be lost, and a delayed tick only delays a debounce commit.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the host's event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command(EditCommand),
    /// Periodic tick used to poll the debounce deadline.
    Tick,
    /// Write the document back through the host's source.
    Save,
    /// The visible area changed to `width` columns by `height` rows.
    Resize { width: usize, height: usize },
    Shutdown,
}

/// Which edge a `MoveLineEdge` / `MoveDocumentEdge` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// A decoded editor command. Every variant maps onto one `Editor` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    InsertText(String),
    DeleteSelection,
    Backspace,
    DeleteForward,
    Indent,
    Outdent,
    ToggleComment,
    DuplicateLine,
    DuplicateSelection,
    ReorderLineUp,
    ReorderLineDown,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    MoveTo { to: Cursor, selecting: bool },
    MoveChar { dir: Direction, selecting: bool },
    MoveWord { dir: Direction, selecting: bool },
    MoveParagraph { dir: Direction, selecting: bool },
    MoveLine { dir: Direction, selecting: bool },
    MovePage { dir: Direction, selecting: bool },
    MoveLineEdge { edge: Edge, selecting: bool },
    MoveDocumentEdge { edge: Edge, selecting: bool },
    SelectAll,
    SelectNone,
    SelectWordAt(Cursor),
    SelectLineAt(Cursor),
    /// Drag-extend the selection over the word under the cursor position.
    ExtendWordTo(Cursor),
    /// Drag-extend the selection over the row under the cursor position.
    ExtendLineTo(Cursor),
    Find {
        pattern: String,
        case_sensitive: bool,
        mode: SearchMode,
    },
    FindNext,
    FindPrevious,
    ClearFind,
    ReplaceCurrent(String),
    ReplaceAll(String),
    FocusLost,
    ClearHistory,
}

impl EditCommand {
    /// True for commands that change buffer content.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            EditCommand::InsertText(_)
                | EditCommand::DeleteSelection
                | EditCommand::Backspace
                | EditCommand::DeleteForward
                | EditCommand::Indent
                | EditCommand::Outdent
                | EditCommand::ToggleComment
                | EditCommand::DuplicateLine
                | EditCommand::DuplicateSelection
                | EditCommand::ReorderLineUp
                | EditCommand::ReorderLineDown
                | EditCommand::Undo
                | EditCommand::Redo
                | EditCommand::Cut
                | EditCommand::Paste
                | EditCommand::ReplaceCurrent(_)
                | EditCommand::ReplaceAll(_)
        )
    }
}

/// Notifications the engine emits to its observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A debounced burst became one undo unit.
    ContentCommitted {
        version: u64,
        /// Rows touched by the burst, in post-edit coordinates.
        rows: RangeInclusive<usize>,
        ops: usize,
    },
    /// A mutation was refused because the editor is read-only.
    ReadOnlyRejected,
    HistoryCleared,
    Reloaded { version: u64, lines: usize },
    Saved { version: u64 },
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Implemented by any async event producer. Implementors hold their configuration and spawn one
/// background task that pushes `Event`s into the shared channel, stopping once a send fails.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier for logging.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, each with its own `Sender` clone. The registry is emptied so
    /// a second call spawns nothing. Drop the caller's last `Sender` before awaiting the handles
    /// so sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every `interval` until the channel closes.
pub struct TickEventSource {
    interval: std::time::Duration,
}

impl TickEventSource {
    pub fn new(interval: std::time::Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    tracing::debug!(target: "runtime.events", "tick source stopping: channel closed");
                    break;
                }
            }
        })
    }
}
