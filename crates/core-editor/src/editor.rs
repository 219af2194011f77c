//! The engine facade: owns the document, its history, selection, layout cache,
//! viewport, and finder, and routes every change through one apply path.
//!
//! Apply path for a mutation:
//! 1. Build operations against the current buffer.
//! 2. `Document::apply` stamps touched lines and bumps the version once.
//! 3. Mirror each `LineDelta` into the layout cache.
//! 4. Place the selection, follow it with the viewport.
//! 5. Queue the change with the debounced history.
//!
//! A debounced commit (or undo/redo) re-highlights every row whose revision is
//! newer than the last highlight pass and announces `ContentCommitted`.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;

use core_events::{
    Clipboard, EditorEvent, Highlighter, MemoryClipboard, Notifier, PlainHighlighter, ViewportHost,
};
use core_render::{LayoutCache, LineLayout, ScrollOffsets, Viewport, ViewportSize};
use core_search::Finder;
use core_state::{Applied, Clock, Document, Operation, SystemClock, TextChange, UndoEngine, VersionCounter};
use core_text::{Buffer, Cursor, Selection, grapheme};
use tracing::{debug, trace, warn};

use crate::options::EditorOptions;

pub struct Editor {
    pub(crate) doc: Document,
    pub(crate) history: UndoEngine,
    pub(crate) selection: Selection,
    pub(crate) sticky_col: Option<usize>,
    pub(crate) cache: LayoutCache,
    pub(crate) viewport: Viewport,
    pub(crate) finder: Finder,
    /// Document version the finder's matches were computed against.
    pub(crate) finder_version: u64,
    pub(crate) options: EditorOptions,
    clock: Arc<dyn Clock>,
    highlighter: Box<dyn Highlighter>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    viewport_host: Option<Box<dyn ViewportHost>>,
    notifiers: Vec<Arc<dyn Notifier>>,
    file_kind: String,
    read_only: bool,
    last_rejection: Option<Instant>,
    highlighted_through: u64,
    saved_version: u64,
    disposed: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("lines", &self.doc.buffer().line_count())
            .field("version", &self.doc.version())
            .field("selection", &self.selection)
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        Self::with_buffer(Buffer::new(), options)
    }

    pub fn with_buffer(buffer: Buffer, options: EditorOptions) -> Self {
        let lines = buffer.line_count();
        let mut editor = Self {
            doc: Document::new(buffer, VersionCounter::new()),
            history: UndoEngine::new(options.history_capacity, options.debounce),
            selection: Selection::default(),
            sticky_col: None,
            cache: LayoutCache::new(lines),
            viewport: Viewport::new(ViewportSize::default(), options.vertical_margin, options.horizontal_margin),
            finder: Finder::new(),
            finder_version: 0,
            options,
            clock: Arc::new(SystemClock),
            highlighter: Box::new(PlainHighlighter),
            clipboard: Box::new(MemoryClipboard::default()),
            viewport_host: None,
            notifiers: Vec::new(),
            file_kind: String::new(),
            read_only: false,
            last_rejection: None,
            highlighted_through: 0,
            saved_version: 0,
            disposed: false,
        };
        editor.highlight_all();
        editor
    }

    pub fn from_lines<I, S>(lines: I, options: EditorOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_buffer(Buffer::from_lines(lines), options)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self.highlight_all();
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_viewport(mut self, host: Box<dyn ViewportHost>) -> Self {
        self.viewport.set_size(host.size());
        self.viewport_host = Some(host);
        self
    }

    pub fn with_file_kind(mut self, kind: impl Into<String>) -> Self {
        self.file_kind = kind.into();
        self.highlight_all();
        self
    }

    pub fn add_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    // ---------------------------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------------------------

    pub fn buffer(&self) -> &Buffer {
        self.doc.buffer()
    }

    pub fn lines(&self) -> Vec<String> {
        self.doc.buffer().texts()
    }

    /// Whole content joined with `\n`.
    pub fn content(&self) -> String {
        self.doc.buffer().flatten()
    }

    pub fn line_count(&self) -> usize {
        self.doc.buffer().line_count()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn cursor(&self) -> Cursor {
        self.selection.end
    }

    pub fn selected_text(&self) -> String {
        if self.selection.is_empty() {
            return String::new();
        }
        self.doc
            .buffer()
            .text_in(self.selection.min(), self.selection.max())
            .join("\n")
    }

    /// `"row:col"`, both 1-based, column counted in characters.
    pub fn cursor_label(&self) -> String {
        let c = self.cursor();
        let col = grapheme::char_col(self.doc.buffer().line_text(c.row), c.col);
        format!("{}:{}", c.row + 1, col + 1)
    }

    /// Empty for a caret, otherwise the selected character count plus the
    /// number of lines when more than one is involved.
    pub fn selection_label(&self) -> String {
        if self.selection.is_empty() {
            return String::new();
        }
        let chars = self.selected_text().chars().count();
        let rows = self.selection.max().row - self.selection.min().row + 1;
        if rows > 1 {
            format!("{chars} selected ({rows} lines)")
        } else {
            format!("{chars} selected")
        }
    }

    pub fn version(&self) -> u64 {
        self.doc.version()
    }

    /// Layout for `row`, computed lazily and cached until the line changes.
    pub fn line_layout(&mut self, row: usize) -> Option<Arc<LineLayout>> {
        let line = self.doc.buffer().line(row)?;
        Some(self.cache.layout_for(row, line))
    }

    pub fn layout_cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn scroll_offsets(&self) -> ScrollOffsets {
        self.viewport.offsets()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Content differs from what was last opened or saved.
    pub fn is_dirty(&self) -> bool {
        self.doc.version() != self.saved_version
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn file_kind(&self) -> &str {
        &self.file_kind
    }

    // ---------------------------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------------------------

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        self.last_rejection = None;
    }

    /// Poll the debounce deadline. Returns true when a burst was committed.
    pub fn tick(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        match self.history.poll(self.clock.now()) {
            Some(change) => {
                self.committed(&change);
                true
            }
            None => false,
        }
    }

    pub fn focus_lost(&mut self) -> bool {
        self.flush()
    }

    /// Force-drain the pending burst into one undo unit.
    pub(crate) fn flush(&mut self) -> bool {
        match self.history.drain() {
            Some(change) => {
                self.committed(&change);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.notify(&EditorEvent::HistoryCleared);
    }

    /// Replace all content: pending edits are committed, history is dropped,
    /// and the document moves to a fresh version baseline.
    pub fn reload<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flush();
        self.history.clear();
        let version = self.doc.reload(lines);
        let count = self.doc.buffer().line_count();
        self.cache.reset(count);
        self.selection = Selection::caret(self.doc.buffer().clamp(self.selection.end));
        self.sticky_col = None;
        self.highlight_all();
        if self.finder.is_active() {
            self.refresh_finder();
        }
        self.follow_cursor();
        debug!(target: "editor", version, lines = count, "reloaded");
        self.notify(&EditorEvent::Reloaded { version, lines: count });
    }

    /// Load from `source` and treat the result as saved content.
    pub fn open(&mut self, source: &mut dyn core_events::DocumentSource) -> anyhow::Result<()> {
        let lines = source.load_lines()?;
        self.file_kind = source.file_kind().to_owned();
        self.selection = Selection::default();
        self.viewport.reset();
        self.reload(lines);
        self.saved_version = self.doc.version();
        Ok(())
    }

    pub fn save(&mut self, source: &mut dyn core_events::DocumentSource) -> anyhow::Result<()> {
        self.flush();
        source.save(&self.lines())?;
        self.saved_version = self.doc.version();
        debug!(target: "editor", version = self.saved_version, "saved");
        self.notify(&EditorEvent::Saved {
            version: self.saved_version,
        });
        Ok(())
    }

    /// Commit pending edits and stop the debounce timer for good. Further
    /// mutations are refused.
    pub fn dispose(&mut self) {
        self.flush();
        self.history.dispose();
        self.disposed = true;
        debug!(target: "editor", "disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Adopt a new viewport size. Margins stay as they are; hosts re-clamp
    /// them for the new size and pass them to `set_scroll_margins`.
    pub fn resize(&mut self, size: ViewportSize) {
        debug!(target: "editor", width = size.width, height = size.height, "resized");
        self.viewport.set_size(size);
        self.follow_cursor();
    }

    pub fn set_scroll_margins(&mut self, vertical: usize, horizontal: usize) {
        self.options.vertical_margin = vertical;
        self.options.horizontal_margin = horizontal;
        self.viewport.set_margins(vertical, horizontal);
        self.follow_cursor();
    }

    // ---------------------------------------------------------------------------------------------
    // Internal plumbing
    // ---------------------------------------------------------------------------------------------

    pub(crate) fn notify(&self, event: &EditorEvent) {
        for n in &self.notifiers {
            n.notify(event);
        }
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Gate for every mutator. A read-only rejection is announced once per
    /// burst; a burst ends after one debounce window without attempts.
    pub(crate) fn writable(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if !self.read_only {
            return true;
        }
        let now = self.clock.now();
        let window = self.options.debounce;
        let in_burst = self
            .last_rejection
            .is_some_and(|t| now.saturating_duration_since(t) < window);
        self.last_rejection = Some(now);
        if !in_burst {
            warn!(target: "editor", "edit_rejected_read_only");
            self.notify(&EditorEvent::ReadOnlyRejected);
        }
        false
    }

    /// Apply `ops` as one change, queue it for history, and place `selection`
    /// (defaults to a caret where the last operation left the cursor).
    pub(crate) fn apply_edit(&mut self, ops: Vec<Operation>, selection: Option<Selection>) -> bool {
        if !self.writable() {
            return false;
        }
        let change = TextChange::new(ops, self.selection);
        let Some(applied) = self.doc.apply(&change) else {
            return false;
        };
        self.mirror(&applied);
        let sel = selection.unwrap_or(Selection::caret(applied.cursor));
        self.selection = self.clamp_selection(sel);
        self.sticky_col = None;
        self.follow_cursor();
        self.history.queue(change, self.clock.now());
        trace!(target: "editor", version = applied.version, "edit_applied");
        true
    }

    pub(crate) fn mirror(&mut self, applied: &Applied) {
        for delta in &applied.deltas {
            self.cache.apply_delta(delta);
        }
        debug_assert_eq!(self.cache.len(), self.doc.buffer().line_count());
    }

    pub(crate) fn clamp_selection(&self, sel: Selection) -> Selection {
        let buf = self.doc.buffer();
        Selection::new(buf.clamp(sel.start), buf.clamp(sel.end))
    }

    fn committed(&mut self, change: &TextChange) {
        let rows = self
            .rehighlight()
            .unwrap_or_else(|| self.cursor().row..=self.cursor().row);
        let version = self.doc.version();
        debug!(target: "editor", version, ops = change.len(), first_row = rows.start(), last_row = rows.end(), "content_committed");
        self.notify(&EditorEvent::ContentCommitted {
            version,
            rows,
            ops: change.len(),
        });
    }

    /// Re-derive spans for rows changed since the last pass. Returns the span
    /// of rows touched, if any.
    pub(crate) fn rehighlight(&mut self) -> Option<RangeInclusive<usize>> {
        let since = self.highlighted_through;
        let stale: Vec<usize> = self
            .doc
            .buffer()
            .lines()
            .enumerate()
            .filter(|(_, l)| l.revision() > since)
            .map(|(row, _)| row)
            .collect();
        for &row in &stale {
            let text = self.doc.buffer().line_text(row);
            let styled = self.highlighter.highlight(text, &self.file_kind);
            self.doc.set_spans(row, styled.spans);
            self.cache.invalidate(row);
        }
        self.highlighted_through = self.doc.version();
        trace!(target: "editor", rows = stale.len(), "rehighlighted");
        Some(*stale.first()?..=*stale.last()?)
    }

    fn highlight_all(&mut self) {
        for row in 0..self.doc.buffer().line_count() {
            let text = self.doc.buffer().line_text(row);
            let styled = self.highlighter.highlight(text, &self.file_kind);
            self.doc.set_spans(row, styled.spans);
            self.cache.invalidate(row);
        }
        self.highlighted_through = self.doc.version();
    }

    /// Scroll so the cursor stays visible; pushes offsets to the host when they move.
    pub(crate) fn follow_cursor(&mut self) {
        let c = self.cursor();
        let vcol = grapheme::visual_col(self.doc.buffer().line_text(c.row), c.col);
        if self.viewport.follow(c.row, vcol)
            && let Some(host) = self.viewport_host.as_mut()
        {
            host.scroll_to(self.viewport.offsets());
        }
    }

    pub(crate) fn page_rows(&self) -> usize {
        self.viewport.page_rows()
    }
}
