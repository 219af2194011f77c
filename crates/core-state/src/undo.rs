use std::collections::VecDeque;
use std::time::{Duration, Instant};

use core_text::Selection;
use tracing::{debug, trace};

use crate::clock::DebounceTimer;
use crate::document::{Applied, Document};
use crate::operation::TextChange;

/// Maximum number of changes retained on each history stack.
pub const UNDO_HISTORY_MAX: usize = 1000;
/// Quiet period after which a burst of edits becomes one undo unit.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(400);

/// Result of an undo or redo step.
#[derive(Debug, Clone)]
pub struct HistoryStep {
    pub applied: Applied,
    /// Selection the caller should restore.
    pub selection: Selection,
}

/// Bounded undo/redo history with debounced batching.
///
/// Changes are applied by the caller immediately; the engine only records
/// them. Both stacks hold forward changes: undo applies the inverse of the top
/// of the undo stack, redo re-applies the top of the redo stack.
#[derive(Debug)]
pub struct UndoEngine {
    undo_stack: VecDeque<TextChange>,
    redo_stack: Vec<TextChange>,
    pending: Vec<TextChange>,
    timer: DebounceTimer,
    capacity: usize,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new(UNDO_HISTORY_MAX, DEBOUNCE_WINDOW)
    }
}

impl UndoEngine {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            timer: DebounceTimer::new(window),
            capacity: capacity.max(1),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn window(&self) -> Duration {
        self.timer.window()
    }
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.pending.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record an already-applied change and restart the debounce window. A new
    /// edit invalidates the redo history.
    pub fn queue(&mut self, change: TextChange, now: Instant) {
        if change.is_empty() {
            return;
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
        self.pending.push(change);
        self.timer.arm(now);
        trace!(target: "state.debounce", pending = self.pending.len(), "timer_armed");
    }

    /// Drain if the debounce deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<TextChange> {
        if !self.timer.expired(now) {
            return None;
        }
        trace!(target: "state.debounce", pending = self.pending.len(), "timer_fired");
        self.drain()
    }

    /// Merge every pending change into one undo unit. Returns the committed
    /// unit so the caller can announce it.
    pub fn drain(&mut self) -> Option<TextChange> {
        self.timer.cancel();
        let merged = TextChange::merge(self.pending.drain(..))?;
        self.push_undo(merged.clone());
        debug!(target: "state.undo", undo_depth = self.undo_stack.len(), ops = merged.len(), "burst_committed");
        Some(merged)
    }

    fn push_undo(&mut self, change: TextChange) {
        self.undo_stack.push_back(change);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    /// Force-drain, then revert the newest unit. Callers wanting to announce the
    /// drained burst call `drain` themselves first.
    pub fn undo(&mut self, doc: &mut Document) -> Option<HistoryStep> {
        self.drain();
        let change = self.undo_stack.pop_back()?;
        let applied = doc.apply(&change.invert())?;
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len() + 1, version = applied.version, "undo_pop");
        let selection = change.selection_before();
        self.redo_stack.push(change);
        if self.redo_stack.len() > self.capacity {
            self.redo_stack.remove(0);
        }
        Some(HistoryStep {
            applied,
            selection,
        })
    }

    pub fn redo(&mut self, doc: &mut Document) -> Option<HistoryStep> {
        // Queuing already voided the redo stack, so a drain here leaves it empty.
        self.drain();
        let change = self.redo_stack.pop()?;
        let applied = doc.apply(&change)?;
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len() + 1, version = applied.version, "redo_pop");
        let selection = Selection::caret(applied.cursor);
        self.push_undo(change);
        Some(HistoryStep {
            applied,
            selection,
        })
    }

    /// Forget every stacked and pending change.
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.pending.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!(target: "state.undo", "history_cleared");
    }

    /// Stop the timer for good. Pending changes stay queued until drained.
    pub fn dispose(&mut self) {
        self.timer.dispose();
        trace!(target: "state.debounce", "timer_disposed");
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}
