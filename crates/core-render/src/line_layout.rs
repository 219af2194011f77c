//! Per-line layout: highlighter spans plus a grapheme -> visual column table.
//!
//! Invariants:
//! - `clusters` is ordered by `byte` and covers the whole line.
//! - `clusters[i].col` is the sum of the advances of every earlier cluster
//!   (tabs expand to the next `TAB_STOP`).
//! - `width` is the visual column right after the last cluster.

use core_text::width::cell_advance;
use core_text::{Line, StyleSpan, grapheme};
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme cluster placed on the visual grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterCell {
    /// Byte offset of the cluster start.
    pub byte: usize,
    /// Visual column the cluster starts at.
    pub col: usize,
    /// Cells the cluster occupies.
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineLayout {
    pub spans: Vec<StyleSpan>,
    pub clusters: Vec<ClusterCell>,
    pub width: usize,
    byte_len: usize,
}

impl LineLayout {
    pub fn compute(line: &Line) -> Self {
        let text = line.text();
        let mut clusters = Vec::new();
        let mut col = 0usize;
        for (byte, g) in text.grapheme_indices(true) {
            let width = cell_advance(g, col);
            clusters.push(ClusterCell { byte, col, width });
            col += width;
        }
        Self {
            spans: line.spans().to_vec(),
            clusters,
            width: col,
            byte_len: text.len(),
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Visual column of the cluster starting at (or containing) `byte`.
    pub fn visual_col(&self, byte: usize) -> usize {
        if byte >= self.byte_len {
            return self.width;
        }
        match self.clusters.binary_search_by_key(&byte, |c| c.byte) {
            Ok(i) => self.clusters[i].col,
            Err(i) => self.clusters[i.saturating_sub(1)].col,
        }
    }

    /// Byte offset of the cluster covering visual column `col`; past the end
    /// yields the line length.
    pub fn byte_at_col(&self, col: usize) -> usize {
        self.clusters
            .iter()
            .find(|c| col < c.col + c.width)
            .map_or(self.byte_len, |c| c.byte)
    }

    /// Cross-check against the slow path (used in tests and debug asserts).
    pub fn agrees_with(&self, text: &str) -> bool {
        self.clusters
            .iter()
            .all(|c| grapheme::visual_col(text, c.byte) == c.col)
            && grapheme::visual_col(text, text.len()) == self.width
    }
}
