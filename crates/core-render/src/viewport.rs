//! Viewport scroll state.
//!
//! Guarantees:
//! * `offsets.first_row` keeps the cursor row inside `[first + m, first + h - m)`
//!   where `m` is the vertical margin clamped to half the height.
//! * `offsets.first_col` keeps the cursor's visual column inside the width
//!   under the same rule with the horizontal margin.
//! * A zero-sized viewport never scrolls.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    pub width: usize,
    pub height: usize,
}

impl ViewportSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffsets {
    pub first_row: usize,
    pub first_col: usize,
}

/// Compute a new first line that keeps `cursor_line` inside the margin band,
/// or `None` when no scroll is needed.
pub fn compute_scroll_intent(
    first: usize,
    cursor_line: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let bottom = first + text_height;
    let new_first = if cursor_line < first + m {
        cursor_line.saturating_sub(m)
    } else if cursor_line + m >= bottom {
        cursor_line + m + 1 - text_height
    } else {
        return None;
    };
    (new_first != first).then_some(new_first)
}

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    size: ViewportSize,
    offsets: ScrollOffsets,
    vertical_margin: usize,
    horizontal_margin: usize,
}

impl Viewport {
    pub fn new(size: ViewportSize, vertical_margin: usize, horizontal_margin: usize) -> Self {
        Self {
            size,
            offsets: ScrollOffsets::default(),
            vertical_margin,
            horizontal_margin,
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn offsets(&self) -> ScrollOffsets {
        self.offsets
    }

    pub fn set_size(&mut self, size: ViewportSize) {
        self.size = size;
    }

    pub fn set_margins(&mut self, vertical: usize, horizontal: usize) {
        self.vertical_margin = vertical;
        self.horizontal_margin = horizontal;
    }

    /// Rows a page motion travels.
    pub fn page_rows(&self) -> usize {
        self.size.height.max(1)
    }

    pub fn reset(&mut self) {
        self.offsets = ScrollOffsets::default();
    }

    /// Scroll so the cursor stays within the margin bands. Returns true when
    /// either offset changed.
    pub fn follow(&mut self, cursor_row: usize, cursor_visual_col: usize) -> bool {
        let before = self.offsets;
        if let Some(first) = compute_scroll_intent(
            self.offsets.first_row,
            cursor_row,
            self.size.height,
            self.vertical_margin,
        ) {
            self.offsets.first_row = first;
        }
        if let Some(first) = compute_scroll_intent(
            self.offsets.first_col,
            cursor_visual_col,
            self.size.width,
            self.horizontal_margin,
        ) {
            self.offsets.first_col = first;
        }
        let changed = before != self.offsets;
        if changed {
            trace!(target: "render.viewport", first_row = self.offsets.first_row, first_col = self.offsets.first_col, "scrolled");
        }
        changed
    }
}
