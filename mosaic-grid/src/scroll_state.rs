//! Shared scroll and viewport state.
//!
//! Scroll events arrive at native rate while the visible-set recompute is
//! deferred to the next frame, so the offset lives in an explicit
//! single-writer holder: event handlers write through the mutating methods,
//! and deferred work pulls [`ScrollState::read`] when it actually runs.
//! Nothing ever captures an offset at schedule time.

use mosaic_foundation::Px;
use parking_lot::RwLock;

/// Snapshot of the scroll metrics at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top of the content, never negative.
    pub offset: Px,
    /// Height of the viewport the content scrolls within.
    pub viewport_height: Px,
    /// Total vertical extent of the laid-out content.
    pub content_extent: Px,
}

impl ScrollMetrics {
    /// Bottom edge of the viewport in content coordinates.
    pub fn viewport_bottom(self) -> Px {
        self.offset.saturating_add(self.viewport_height)
    }

    /// Scroll progress through the content as a fraction in `[0, 1]`.
    pub fn fraction(self) -> f32 {
        if self.content_extent <= Px::ZERO {
            0.0
        } else {
            (self.offset.to_f32() / self.content_extent.to_f32()).clamp(0.0, 1.0)
        }
    }
}

/// Single-writer, multi-reader holder for scroll metrics.
///
/// Offsets are clamped on write to `[0, max(0, extent − viewport)]`, so
/// readers never observe an offset pointing past the content.
#[derive(Debug)]
pub struct ScrollState {
    metrics: RwLock<ScrollMetrics>,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    /// Creates a holder with zeroed metrics.
    pub fn new() -> Self {
        Self {
            metrics: RwLock::new(ScrollMetrics {
                offset: Px::ZERO,
                viewport_height: Px::ZERO,
                content_extent: Px::ZERO,
            }),
        }
    }

    /// Returns the latest committed metrics.
    pub fn read(&self) -> ScrollMetrics {
        *self.metrics.read()
    }

    /// Records a new scroll offset. Applied immediately and unconditionally;
    /// writes are never dropped or reordered.
    pub fn write_offset(&self, offset: Px) {
        let mut metrics = self.metrics.write();
        metrics.offset = clamp_offset(offset, *metrics);
    }

    /// Updates the viewport height and re-clamps the offset.
    pub fn set_viewport_height(&self, viewport_height: Px) {
        let mut metrics = self.metrics.write();
        metrics.viewport_height = viewport_height.positive();
        metrics.offset = clamp_offset(metrics.offset, *metrics);
    }

    /// Commits a new content extent (after a layout pass) and re-clamps.
    pub fn set_content_extent(&self, content_extent: Px) {
        let mut metrics = self.metrics.write();
        metrics.content_extent = content_extent.positive();
        metrics.offset = clamp_offset(metrics.offset, *metrics);
    }
}

fn clamp_offset(offset: Px, metrics: ScrollMetrics) -> Px {
    let max = metrics
        .content_extent
        .saturating_sub(metrics.viewport_height)
        .positive();
    offset.positive().min(max)
}
