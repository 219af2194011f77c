//! Collaborator interfaces the engine consumes, plus in-memory implementations
//! used by headless hosts and tests.

use std::sync::{Arc, Mutex};

use core_render::{ScrollOffsets, ViewportSize};
use core_text::StyledLine;

use crate::EditorEvent;

/// Loads and stores raw line content. Lines never contain `\n`.
pub trait DocumentSource {
    fn load_lines(&mut self) -> anyhow::Result<Vec<String>>;
    fn save(&mut self, lines: &[String]) -> anyhow::Result<()>;
    /// Kind hint passed to the highlighter (usually a file extension).
    fn file_kind(&self) -> &str {
        ""
    }
}

/// Pure function from line text to styled spans.
pub trait Highlighter {
    fn highlight(&self, text: &str, file_kind: &str) -> StyledLine;
}

pub trait Clipboard {
    fn get_text(&self) -> Option<String>;
    fn set_text(&mut self, text: String);
}

/// Receives scroll offsets and reports the visible size.
pub trait ViewportHost {
    fn size(&self) -> ViewportSize;
    fn scroll_to(&mut self, offsets: ScrollOffsets);
}

/// Observer hook; must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &EditorEvent);
}

/// Highlighter that attaches no spans.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, text: &str, _file_kind: &str) -> StyledLine {
        StyledLine::plain(text)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Option<String> {
        self.text.clone()
    }
    fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}

/// Viewport of a fixed size that records the last offsets it was sent.
#[derive(Debug, Default, Clone)]
pub struct FixedViewport {
    size: ViewportSize,
    last: Option<ScrollOffsets>,
    pushes: usize,
}

impl FixedViewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: ViewportSize::new(width, height),
            ..Self::default()
        }
    }

    pub fn last_offsets(&self) -> Option<ScrollOffsets> {
        self.last
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }
}

impl ViewportHost for FixedViewport {
    fn size(&self) -> ViewportSize {
        self.size
    }
    fn scroll_to(&mut self, offsets: ScrollOffsets) {
        self.last = Some(offsets);
        self.pushes += 1;
    }
}

/// Document source backed by a shared vector; clones see the same content.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    lines: Arc<Mutex<Vec<String>>>,
    kind: String,
}

impl MemorySource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Arc::new(Mutex::new(lines.into_iter().map(Into::into).collect())),
            kind: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl DocumentSource for MemorySource {
    fn load_lines(&mut self) -> anyhow::Result<Vec<String>> {
        let lines = self
            .lines
            .lock()
            .map_err(|_| anyhow::anyhow!("memory source lock poisoned"))?;
        Ok(lines.clone())
    }

    fn save(&mut self, lines: &[String]) -> anyhow::Result<()> {
        let mut stored = self
            .lines
            .lock()
            .map_err(|_| anyhow::anyhow!("memory source lock poisoned"))?;
        *stored = lines.to_vec();
        Ok(())
    }

    fn file_kind(&self) -> &str {
        &self.kind
    }
}

/// Notifier that keeps every event; clones share the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count(&self, pred: impl Fn(&EditorEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &EditorEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_round_trips() {
        let mut src = MemorySource::new(["a", "b"]).with_kind("rs");
        let view = src.clone();
        assert_eq!(src.load_lines().unwrap(), vec!["a", "b"]);
        src.save(&["c".to_string()]).unwrap();
        assert_eq!(view.snapshot(), vec!["c"]);
        assert_eq!(src.file_kind(), "rs");
    }

    #[test]
    fn recording_notifier_shares_log() {
        let n = RecordingNotifier::new();
        let handle = n.clone();
        n.notify(&EditorEvent::HistoryCleared);
        n.notify(&EditorEvent::ReadOnlyRejected);
        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.count(|e| matches!(e, EditorEvent::ReadOnlyRejected)), 1);
    }

    #[test]
    fn fixed_viewport_records_pushes() {
        let mut vp = FixedViewport::new(80, 24);
        assert_eq!(vp.size(), ViewportSize::new(80, 24));
        vp.scroll_to(ScrollOffsets { first_row: 3, first_col: 0 });
        assert_eq!(vp.pushes(), 1);
        assert_eq!(vp.last_offsets().map(|o| o.first_row), Some(3));
    }

    #[test]
    fn clipboard_and_plain_highlighter() {
        let mut cb = MemoryClipboard::default();
        assert_eq!(cb.get_text(), None);
        cb.set_text("x".into());
        assert_eq!(cb.get_text().as_deref(), Some("x"));
        let styled = PlainHighlighter.highlight("fn main", "rs");
        assert!(styled.spans.is_empty());
        assert_eq!(styled.text, "fn main");
    }
}
