//! Masonry packing: turning an ordered item sequence into absolute positions.
//!
//! The packing is the classic greedy shortest-lane rule — every item goes to
//! the currently shortest column, ties broken leftmost. It is a pure function
//! of the inputs: same items and configuration always reproduce the same
//! positions and extent, which is what lets scroll handling treat the
//! committed layout as an immutable value and replace it wholesale.

use mosaic_foundation::{Px, PxPosition, PxRect, PxSize};
use smallvec::{SmallVec, smallvec};

use crate::item::{GridItem, ItemId};

/// Default spacing between columns and between stacked items.
pub const DEFAULT_GAP: Px = Px(20);

/// Lane accumulator sized for the breakpoint model's maximum of four columns.
type LaneOffsets = SmallVec<[Px; 4]>;

/// Column configuration for one layout pass.
///
/// Derived from the viewport width by [`breakpoints`](crate::breakpoints) and
/// recomputed only on (debounced) resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasonryConfig {
    /// Number of columns, always at least 1.
    pub column_count: usize,
    /// Width every placed item gets, in physical pixels.
    pub column_width: Px,
    /// Spacing between columns and between stacked items.
    pub gap: Px,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            column_count: 1,
            column_width: Px(320),
            gap: DEFAULT_GAP,
        }
    }
}

/// Absolute placement of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPosition {
    /// The item this placement belongs to.
    pub id: ItemId,
    /// Placement rectangle; `size.width` equals the pass's column width and
    /// `size.height` equals the item's intrinsic height.
    pub rect: PxRect,
}

/// The committed output of one layout pass.
///
/// Positions are in item sequence order, one per input item. The pair is
/// recomputed atomically whenever the sequence or the configuration changes
/// and is never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasonryLayout {
    /// Absolute placements, in item sequence order.
    pub positions: Vec<ItemPosition>,
    /// Bottom edge of the tallest column.
    pub total_extent: Px,
    /// Column count this pass was computed with.
    pub column_count: usize,
}

impl MasonryLayout {
    /// True when no items have been laid out.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of laid-out items.
    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Packs `items` into columns and returns their absolute positions together
/// with the total vertical extent.
///
/// One O(n · columns) pass; the shortest-lane search is a linear scan, which
/// at four lanes beats any indexed structure. Empty input yields an empty
/// layout with zero extent.
pub fn compute_layout(items: &[GridItem], config: &MasonryConfig) -> MasonryLayout {
    let lane_count = config.column_count.max(1);
    let mut lane_offsets: LaneOffsets = smallvec![Px::ZERO; lane_count];
    let mut positions = Vec::with_capacity(items.len());

    let stride = config.column_width.saturating_add(config.gap);
    for item in items {
        let lane = find_shortest_lane(&lane_offsets);
        let y = lane_offsets[lane];
        let x = stride.saturating_mul_count(lane);

        positions.push(ItemPosition {
            id: item.id,
            rect: PxRect::new(
                PxPosition::new(x, y),
                PxSize::new(config.column_width, item.intrinsic_height),
            ),
        });

        lane_offsets[lane] = y
            .saturating_add(item.intrinsic_height)
            .saturating_add(config.gap);
    }

    MasonryLayout {
        positions,
        total_extent: finalize_lane_offsets(&lane_offsets, config.gap),
        column_count: lane_count,
    }
}

/// Index of the lowest lane; the leftmost wins on ties.
fn find_shortest_lane(lane_offsets: &[Px]) -> usize {
    let mut index = 0;
    let mut best = lane_offsets.first().copied().unwrap_or(Px::ZERO);
    for (i, offset) in lane_offsets.iter().enumerate().skip(1) {
        if *offset < best {
            best = *offset;
            index = i;
        }
    }
    index
}

/// Extent of the tallest lane, with the trailing gap stripped so the value is
/// the bottom edge of the lowest placed item.
fn finalize_lane_offsets(lane_offsets: &[Px], gap: Px) -> Px {
    let max_offset = lane_offsets.iter().copied().max().unwrap_or(Px::ZERO);
    if max_offset == Px::ZERO {
        Px::ZERO
    } else {
        (max_offset - gap).positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ImageRef, PlaceholderToken};
    use std::sync::Arc;

    fn item(id: u64, height: i32) -> GridItem {
        GridItem {
            id: ItemId(id),
            title: Arc::from(format!("Item {id}")),
            category: Arc::from("Test"),
            image: ImageRef::new(format!("media/{id}")),
            intrinsic_height: Px(height),
            placeholder: PlaceholderToken::new("L6PZfSjE.AyE_3t7t7R**0o#DgR4"),
        }
    }

    fn items(heights: &[i32]) -> Vec<GridItem> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| item(i as u64 + 1, *h))
            .collect()
    }

    fn config(columns: usize, width: i32, gap: i32) -> MasonryConfig {
        MasonryConfig {
            column_count: columns,
            column_width: Px(width),
            gap: Px(gap),
        }
    }

    #[test]
    fn test_single_column_stacks_with_gap() {
        let layout = compute_layout(&items(&[100, 300, 200]), &config(1, 400, 20));

        let ys: Vec<Px> = layout.positions.iter().map(|p| p.rect.top()).collect();
        assert_eq!(ys, vec![Px(0), Px(120), Px(440)]);
        assert_eq!(layout.total_extent, Px(640));
    }

    #[test]
    fn test_two_columns_fill_alternately() {
        let layout = compute_layout(&items(&[100, 100, 100, 100]), &config(2, 300, 10));

        let xs: Vec<Px> = layout.positions.iter().map(|p| p.rect.origin.x).collect();
        assert_eq!(xs, vec![Px(0), Px(310), Px(0), Px(310)]);
        let ys: Vec<Px> = layout.positions.iter().map(|p| p.rect.top()).collect();
        assert_eq!(ys, vec![Px(0), Px(0), Px(110), Px(110)]);
        assert_eq!(layout.total_extent, Px(210));
    }

    #[test]
    fn test_empty_sequence_yields_empty_layout() {
        let layout = compute_layout(&[], &config(3, 300, 20));
        assert!(layout.is_empty());
        assert_eq!(layout.total_extent, Px::ZERO);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let seq = items(&[240, 300, 380, 240, 480, 240, 300, 380]);
        let cfg = config(3, 280, 20);
        assert_eq!(compute_layout(&seq, &cfg), compute_layout(&seq, &cfg));
    }

    #[test]
    fn test_positions_never_negative() {
        let layout = compute_layout(&items(&[50, 70, 90, 110]), &config(4, 200, 20));
        for pos in &layout.positions {
            assert!(pos.rect.origin.x >= Px::ZERO);
            assert!(pos.rect.top() >= Px::ZERO);
        }
    }

    #[test]
    fn test_no_overlap_within_column() {
        let layout = compute_layout(
            &items(&[240, 300, 380, 240, 480, 240, 300, 380, 240, 480]),
            &config(3, 280, 20),
        );

        for (i, a) in layout.positions.iter().enumerate() {
            for b in layout.positions.iter().skip(i + 1) {
                if a.rect.origin.x == b.rect.origin.x {
                    let disjoint = a.rect.bottom() < b.rect.top() || b.rect.bottom() < a.rect.top();
                    assert!(disjoint, "items in the same column overlap");
                }
            }
        }
    }

    #[test]
    fn test_greedy_balance_bound() {
        let heights = [240, 300, 380, 240, 480, 240, 300, 380, 240, 480, 300, 240];
        let gap = 20;
        let layout = compute_layout(&items(&heights), &config(3, 280, gap));

        // Reconstruct per-column bottoms from the committed positions.
        let mut bottoms = std::collections::BTreeMap::new();
        for pos in &layout.positions {
            let entry = bottoms.entry(pos.rect.origin.x.raw()).or_insert(Px::ZERO);
            *entry = (*entry).max(pos.rect.bottom());
        }
        let max = bottoms.values().copied().max().unwrap_or(Px::ZERO);
        let min = bottoms.values().copied().min().unwrap_or(Px::ZERO);
        let tallest_item = heights.iter().copied().max().unwrap_or(0);

        assert!(max - min <= Px(tallest_item + gap));
    }

    #[test]
    fn test_appending_never_shrinks_extent() {
        let cfg = config(2, 300, 20);
        let mut seq = items(&[240, 300, 380]);
        let before = compute_layout(&seq, &cfg).total_extent;

        seq.push(item(4, 480));
        seq.push(item(5, 240));
        let after = compute_layout(&seq, &cfg).total_extent;

        assert!(after >= before);
    }

    #[test]
    fn test_flattened_y_is_non_decreasing() {
        // The windowing scan's soft exit leans on this: a placed item's y is
        // the minimum lane offset at placement time, and lane offsets only
        // grow.
        let layout = compute_layout(
            &items(&[480, 100, 100, 480, 100, 300, 240, 380, 100, 480]),
            &config(3, 280, 20),
        );
        for pair in layout.positions.windows(2) {
            assert!(pair[0].rect.top() <= pair[1].rect.top());
        }
    }

    #[test]
    fn test_zero_column_count_is_treated_as_one() {
        let layout = compute_layout(&items(&[100]), &config(0, 300, 20));
        assert_eq!(layout.column_count, 1);
        assert_eq!(layout.positions[0].rect.origin, PxPosition::ZERO);
    }
}
