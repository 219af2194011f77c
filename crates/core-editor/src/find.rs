//! Find / replace wired into the editor's selection and edit path.

use core_search::{FindError, SearchMode};
use core_state::Operation;
use tracing::debug;

use crate::editor::Editor;

impl Editor {
    /// Search the whole document and select the first match at or after the
    /// selection start (wrapping). Returns the match count.
    pub fn find(&mut self, pattern: &str, case_sensitive: bool, mode: SearchMode) -> Result<usize, FindError> {
        let from = self.selection.min();
        let count = self
            .finder
            .search(self.doc.buffer(), pattern, case_sensitive, mode, from)?;
        self.finder_version = self.doc.version();
        self.select_target();
        Ok(count)
    }

    /// Recompute matches from the cursor after an edit made them stale.
    pub(crate) fn refresh_finder(&mut self) {
        let from = self.selection.min();
        self.finder.refresh(self.doc.buffer(), from);
        self.finder_version = self.doc.version();
    }

    /// Refresh if the document changed since the last scan. Returns whether it did.
    fn resync_finder(&mut self) -> bool {
        if !self.finder.is_active() || self.finder_version == self.doc.version() {
            return false;
        }
        self.refresh_finder();
        true
    }

    fn select_target(&mut self) -> bool {
        let Some(m) = self.finder.current() else {
            return false;
        };
        self.selection = m.range;
        self.sticky_col = None;
        self.follow_cursor();
        true
    }

    pub fn find_next(&mut self) -> bool {
        let refreshed = self.resync_finder();
        let on_target = self
            .finder
            .current()
            .is_some_and(|m| m.range == self.selection);
        if (!refreshed || on_target) && self.finder.next().is_none() {
            return false;
        }
        self.select_target()
    }

    pub fn find_previous(&mut self) -> bool {
        self.resync_finder();
        if self.finder.previous().is_none() {
            return false;
        }
        self.select_target()
    }

    /// Replace the targeted match through the normal edit path, then target
    /// the first match after the replacement.
    pub fn replace_current(&mut self, replacement: &str) -> bool {
        self.resync_finder();
        let Some(plan) = self.finder.plan_replace_current(replacement) else {
            return false;
        };
        if self.selection.normalized() != plan.range {
            self.selection = plan.range;
        }
        if plan.text.is_empty() {
            if !self.delete_selection() {
                return false;
            }
        } else if !self.insert_text(&plan.text) {
            return false;
        }
        let after = self.cursor();
        self.finder.refresh(self.doc.buffer(), after);
        self.finder_version = self.doc.version();
        self.select_target();
        true
    }

    /// Replace every match as one undo unit. Replacement text is never rescanned.
    pub fn replace_all(&mut self, replacement: &str) -> bool {
        self.resync_finder();
        let plan = self.finder.plan_replace_all(replacement);
        if plan.is_empty() || !self.writable() {
            return false;
        }
        // Earlier edits go into their own unit so this one stands alone.
        self.flush();
        let buf = self.doc.buffer();
        let mut ops = Vec::with_capacity(plan.len() * 2);
        // Right to left keeps every earlier range valid.
        for r in plan.iter().rev() {
            ops.push(Operation::delete_range(buf, r.range));
            if !r.text.is_empty() {
                ops.push(Operation::insert_text(r.range.start, &r.text));
            }
        }
        if !self.apply_edit(ops, None) {
            return false;
        }
        self.flush();
        debug!(target: "search", replaced = plan.len(), version = self.doc.version(), "replace_all");
        self.refresh_finder();
        true
    }

    /// `"k of n"`, `"No results"`, or empty when no search is active.
    pub fn find_label(&self) -> String {
        self.finder.match_label()
    }

    pub fn clear_find(&mut self) {
        self.finder.clear();
    }

    pub fn finder(&self) -> &core_search::Finder {
        &self.finder
    }
}
