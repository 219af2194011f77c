//! Render-side derived state: per-line layouts, their version-checked cache,
//! and the scroll state of the viewport.
//!
//! Nothing here paints. Hosts read `LineLayout`s through `LayoutCache` and
//! receive `ScrollOffsets` whenever `Viewport::follow` moves them.
//!
//! Cache lifecycle:
//! - Buffer mutations are mirrored through `LayoutCache::apply_delta` so slot
//!   indices keep matching buffer rows.
//! - Freshness is `entry.version == line.revision`; stale entries are
//!   revalidated by content hash before being recomputed.
//! - Reload resets every slot; re-highlighting invalidates single rows.

pub mod layout_cache;
pub mod line_layout;
pub mod viewport;

pub use layout_cache::{CacheStats, LayoutCache, LayoutEntry, content_hash};
pub use line_layout::{ClusterCell, LineLayout};
pub use viewport::{ScrollOffsets, Viewport, ViewportSize, compute_scroll_intent};
