//! Per-line layout cache keyed by buffer row.
//!
//! Each slot remembers the version it was computed at and an ahash of the line
//! content (text plus spans). A slot is fresh iff its version equals the line's
//! current revision. Stale slots whose hash still matches are revalidated
//! without recomputation, which is what makes undo of an in-place edit cheap.
//!
//! Structural edits shift slots: `remove_range` parks the removed entries in a
//! recently-deleted table keyed by their original row; `insert_range` seeds new
//! slots from that table at the same relative offset (a line moved by
//! delete-then-insert keeps its layout).

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::{AHashMap, AHasher};
use core_text::{Line, LineDelta};
use tracing::trace;

use crate::line_layout::LineLayout;

#[derive(Debug, Clone, Default)]
pub struct LayoutEntry {
    layout: Option<Arc<LineLayout>>,
    version: Option<u64>,
    hash: u64,
}

impl LayoutEntry {
    pub fn layout(&self) -> Option<&Arc<LineLayout>> {
        self.layout.as_ref()
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }
}

/// Counters for cache behavior (exposed for tests and trace summaries).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub revalidated: u64,
    pub computed: u64,
    pub reused_on_insert: u64,
}

#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: Vec<LayoutEntry>,
    recently_deleted: AHashMap<usize, LayoutEntry>,
    deleted_from: usize,
    stats: CacheStats,
}

/// Hash of everything a layout is derived from.
pub fn content_hash(line: &Line) -> u64 {
    let mut hasher = AHasher::default();
    line.text().hash(&mut hasher);
    line.spans().hash(&mut hasher);
    hasher.finish()
}

impl LayoutCache {
    pub fn new(line_count: usize) -> Self {
        Self {
            entries: vec![LayoutEntry::default(); line_count],
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn get(&self, row: usize) -> Option<&LayoutEntry> {
        self.entries.get(row)
    }

    pub fn set(&mut self, row: usize, layout: LineLayout, version: u64, hash: u64) {
        if let Some(slot) = self.entries.get_mut(row) {
            *slot = LayoutEntry {
                layout: Some(Arc::new(layout)),
                version: Some(version),
                hash,
            };
        }
    }

    pub fn is_fresh(&self, row: usize, revision: u64) -> bool {
        self.entries
            .get(row)
            .is_some_and(|e| e.layout.is_some() && e.version == Some(revision))
    }

    /// Layout for `row`, computing it synchronously on a miss.
    pub fn layout_for(&mut self, row: usize, line: &Line) -> Arc<LineLayout> {
        if row >= self.entries.len() {
            // Out-of-sync callers still get a correct layout, just uncached.
            return Arc::new(LineLayout::compute(line));
        }
        let revision = line.revision();
        if self.is_fresh(row, revision)
            && let Some(layout) = &self.entries[row].layout
        {
            self.stats.hits += 1;
            return Arc::clone(layout);
        }
        let hash = content_hash(line);
        let entry = &mut self.entries[row];
        if let Some(layout) = &entry.layout
            && entry.hash == hash
        {
            entry.version = Some(revision);
            self.stats.revalidated += 1;
            trace!(target: "render.layout", row, revision, "layout_revalidated");
            return Arc::clone(layout);
        }
        let layout = Arc::new(LineLayout::compute(line));
        *entry = LayoutEntry {
            layout: Some(Arc::clone(&layout)),
            version: Some(revision),
            hash,
        };
        self.stats.computed += 1;
        trace!(target: "render.layout", row, revision, clusters = layout.cluster_count(), "layout_computed");
        layout
    }

    /// Mark one slot stale while keeping its layout for hash revalidation.
    pub fn invalidate(&mut self, row: usize) {
        if let Some(e) = self.entries.get_mut(row) {
            e.version = None;
        }
    }

    pub fn invalidate_all(&mut self) {
        for e in &mut self.entries {
            e.version = None;
        }
        self.recently_deleted.clear();
        trace!(target: "render.layout", slots = self.entries.len(), "cache_invalidated");
    }

    /// Drop every slot and resize to `line_count` empty slots.
    pub fn reset(&mut self, line_count: usize) {
        self.entries.clear();
        self.entries.resize(line_count, LayoutEntry::default());
        self.recently_deleted.clear();
    }

    /// Remove slots `[start, end)`, parking them for reuse by the next insert.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.entries.len());
        if start >= end {
            return;
        }
        self.recently_deleted.clear();
        self.deleted_from = start;
        for (offset, entry) in self.entries.drain(start..end).enumerate() {
            self.recently_deleted.insert(start + offset, entry);
        }
        trace!(target: "render.layout", start, end, "slots_removed");
    }

    /// Open `count` slots at `at`, seeded from the recently-deleted table.
    pub fn insert_range(&mut self, at: usize, count: usize) {
        let at = at.min(self.entries.len());
        let mut seeded = Vec::with_capacity(count);
        for offset in 0..count {
            match self.recently_deleted.remove(&(self.deleted_from + offset)) {
                Some(entry) => {
                    self.stats.reused_on_insert += 1;
                    // Reused layouts must pass the hash check before being trusted.
                    seeded.push(LayoutEntry { version: None, ..entry });
                }
                None => seeded.push(LayoutEntry::default()),
            }
        }
        self.entries.splice(at..at, seeded);
        trace!(target: "render.layout", at, count, "slots_inserted");
    }

    /// Mirror one buffer mutation.
    pub fn apply_delta(&mut self, delta: &LineDelta) {
        match delta {
            LineDelta::Changed(_) => {}
            LineDelta::Inserted { rows, .. } => self.insert_range(rows.start, rows.len()),
            LineDelta::Removed { rows, .. } => self.remove_range(rows.start, rows.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Cursor};

    fn warm(cache: &mut LayoutCache, buf: &Buffer) {
        for (row, line) in buf.lines().enumerate() {
            cache.layout_for(row, line);
        }
    }

    #[test]
    fn fresh_iff_version_matches_revision() {
        let buf = Buffer::from_lines(["abc", "def"]);
        let mut cache = LayoutCache::new(buf.line_count());
        assert!(!cache.is_fresh(0, 0));
        warm(&mut cache, &buf);
        assert!(cache.is_fresh(0, 0));
        assert!(!cache.is_fresh(0, 1));
        cache.layout_for(0, buf.line(0).unwrap());
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().computed, 2);
    }

    #[test]
    fn stale_entry_with_same_content_is_revalidated() {
        let mut buf = Buffer::from_lines(["abc"]);
        let mut cache = LayoutCache::new(1);
        warm(&mut cache, &buf);
        // Edit then revert: revision moves, content does not.
        buf.insert(Cursor::new(0, 1), &["X".to_string()], 1);
        buf.delete(Cursor::new(0, 1), Cursor::new(0, 2), 2);
        cache.layout_for(0, buf.line(0).unwrap());
        assert_eq!(cache.stats().revalidated, 1);
        assert_eq!(cache.stats().computed, 1);
        assert!(cache.is_fresh(0, 2));
    }

    #[test]
    fn removed_slots_are_reused_at_same_offset() {
        let buf = Buffer::from_lines(["a", "b", "c", "d"]);
        let mut cache = LayoutCache::new(4);
        warm(&mut cache, &buf);
        let b_layout = Arc::clone(cache.get(1).unwrap().layout().unwrap());
        cache.remove_range(1, 3);
        assert_eq!(cache.len(), 2);
        cache.insert_range(2, 2);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.stats().reused_on_insert, 2);
        let reused = cache.get(2).unwrap();
        assert!(Arc::ptr_eq(reused.layout().unwrap(), &b_layout));
        assert_eq!(reused.version(), None);
    }

    #[test]
    fn insert_without_parked_entries_starts_empty() {
        let mut cache = LayoutCache::new(2);
        cache.insert_range(1, 3);
        assert_eq!(cache.len(), 5);
        assert!(cache.get(1).unwrap().layout().is_none());
        assert_eq!(cache.stats().reused_on_insert, 0);
    }

    #[test]
    fn invalidate_all_forces_revalidation() {
        let buf = Buffer::from_lines(["x", "y"]);
        let mut cache = LayoutCache::new(2);
        warm(&mut cache, &buf);
        cache.invalidate_all();
        assert!(!cache.is_fresh(0, 0));
        warm(&mut cache, &buf);
        assert_eq!(cache.stats().revalidated, 2);
    }

    #[test]
    fn apply_delta_tracks_line_count() {
        let mut buf = Buffer::from_lines(["one", "two"]);
        let mut cache = LayoutCache::new(2);
        let (_, delta) = buf.insert(Cursor::new(0, 3), &["".into(), "mid".into()], 1);
        cache.apply_delta(&delta);
        assert_eq!(cache.len(), buf.line_count());
        let (_, delta) = buf.delete(Cursor::new(0, 3), Cursor::new(2, 0), 2);
        cache.apply_delta(&delta);
        assert_eq!(cache.len(), buf.line_count());
    }
}
