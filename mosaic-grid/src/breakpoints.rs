//! Responsive breakpoint resolution.
//!
//! A viewport width maps to a column count through fixed thresholds, and the
//! column width follows by dividing the remaining space evenly. Both
//! functions are total: any non-negative width produces a usable
//! configuration with at least one column.

use mosaic_foundation::Px;

use crate::masonry::MasonryConfig;

const BREAKPOINT_XXL: Px = Px(1536);
const BREAKPOINT_LG: Px = Px(1024);
const BREAKPOINT_SM: Px = Px(640);

/// Maps a viewport width to a column count.
pub fn resolve_column_count(viewport_width: Px) -> usize {
    if viewport_width >= BREAKPOINT_XXL {
        4
    } else if viewport_width >= BREAKPOINT_LG {
        3
    } else if viewport_width >= BREAKPOINT_SM {
        2
    } else {
        1
    }
}

/// Computes the width of a single column: the viewport minus inter-column
/// gaps, divided evenly (integer division floors the result).
pub fn resolve_column_width(viewport_width: Px, column_count: usize, gap: Px) -> Px {
    let count = column_count.max(1);
    let gaps = gap.saturating_mul_count(count - 1);
    (viewport_width.saturating_sub(gaps) / count as i32).positive()
}

/// Resolves the full column configuration for a viewport width.
pub fn resolve_config(viewport_width: Px, gap: Px) -> MasonryConfig {
    let column_count = resolve_column_count(viewport_width);
    MasonryConfig {
        column_count,
        column_width: resolve_column_width(viewport_width, column_count, gap),
        gap,
    }
}
