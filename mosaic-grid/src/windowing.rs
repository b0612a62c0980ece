//! The windowing controller: deciding what gets materialized.
//!
//! The controller owns the item sequence, the committed layout and the
//! loading flags, and answers one question per frame: which minimal subset
//! of the pre-computed positions must exist as live cards right now. Scroll
//! signals mutate shared state immediately and defer the answer to the next
//! frame boundary; resize signals defer a full relayout behind a quiet
//! period; page arrivals append, relayout and eventually release the
//! loading gate.
//!
//! Work per frame is proportional to the number of visible items, never to
//! the collection size — the only O(n) unit is the layout pass itself.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use derive_setters::Setters;
use mosaic_foundation::{Px, PxSize};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    breakpoints,
    item::{GridItem, ItemId},
    masonry::{self, DEFAULT_GAP, MasonryConfig, MasonryLayout},
    scheduler::FrameScheduler,
    scroll_state::{ScrollMetrics, ScrollState},
    source::Page,
};

const DEFAULT_BUFFER: Px = Px(1200);
const DEFAULT_MIN_VISIBLE_ITEMS: usize = 80;
const DEFAULT_LOAD_THRESHOLD: Px = Px(1500);
const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(300);
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_ITEMS: usize = 15_000;

/// Tunables for a windowing controller.
#[derive(Debug, Clone, Setters)]
pub struct WindowingArgs {
    /// Extra margin above and below the viewport that still materializes
    /// cards, hiding scroll-induced popping.
    pub buffer: Px,
    /// Floor on the materialized-set size whenever the collection can
    /// supply it; guards against blank viewports when the geometric scan
    /// degenerates.
    pub min_visible_items: usize,
    /// Distance from the content end at which the next page is requested.
    pub load_threshold: Px,
    /// Quiet period a resize burst must respect before the layout recompute
    /// runs.
    pub resize_debounce: Duration,
    /// Fixed delay after a page arrival before the loading gate reopens.
    /// A stand-in for the real render-complete signal, which is not
    /// reliably observable.
    pub settle_delay: Duration,
    /// Hard ceiling on the collection size; reaching it forces exhaustion
    /// regardless of what the source reports.
    pub max_items: usize,
    /// Spacing between columns and stacked items.
    pub gap: Px,
}

impl Default for WindowingArgs {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
            min_visible_items: DEFAULT_MIN_VISIBLE_ITEMS,
            load_threshold: DEFAULT_LOAD_THRESHOLD,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            max_items: DEFAULT_MAX_ITEMS,
            gap: DEFAULT_GAP,
        }
    }
}

/// Owns the collection, the committed layout and the loading state machine.
pub struct WindowingController {
    args: WindowingArgs,
    items: Vec<GridItem>,
    index_by_id: FxHashMap<ItemId, usize>,
    scroll: Arc<ScrollState>,
    layout: Arc<MasonryLayout>,
    config: MasonryConfig,
    container_width: Px,
    pending_viewport: Option<PxSize>,
    loading_more: bool,
    exhausted: bool,
}

impl WindowingController {
    /// Creates an empty controller with the given tunables.
    pub fn new(args: WindowingArgs) -> Self {
        let gap = args.gap;
        Self {
            args,
            items: Vec::new(),
            index_by_id: FxHashMap::default(),
            scroll: Arc::new(ScrollState::new()),
            layout: Arc::new(MasonryLayout::default()),
            config: breakpoints::resolve_config(Px::ZERO, gap),
            container_width: Px::ZERO,
            pending_viewport: None,
            loading_more: false,
            exhausted: false,
        }
    }

    /// The shared scroll-state holder signal handlers write into.
    pub fn scroll_state(&self) -> Arc<ScrollState> {
        self.scroll.clone()
    }

    /// The last committed layout.
    pub fn layout(&self) -> Arc<MasonryLayout> {
        self.layout.clone()
    }

    /// The column configuration of the last committed layout.
    pub fn config(&self) -> MasonryConfig {
        self.config
    }

    /// The item sequence, in id order.
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    /// Number of items in the collection.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sequence index of an item id, if present.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// True while a page request is outstanding or settling.
    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    /// True once the source is drained or the ceiling was reached.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Handles a scroll signal: the offset is committed immediately, the
    /// visible-set recompute is coalesced to the next frame, and the
    /// low-priority load slot is armed when the window approaches the end
    /// of the content.
    pub fn note_scroll(&mut self, offset: Px, scheduler: &mut FrameScheduler) {
        self.scroll.write_offset(offset);
        scheduler.request_window_pass();

        if self.should_request_more() {
            scheduler.arm_load_request();
        }
    }

    /// Handles a resize signal: dimensions are stashed and the expensive
    /// relayout waits for a quiet period, each new signal resetting the
    /// timer.
    pub fn note_resize(&mut self, viewport: PxSize, now: Instant, scheduler: &mut FrameScheduler) {
        self.pending_viewport = Some(viewport);
        scheduler.defer_relayout(now, self.args.resize_debounce);
    }

    /// Applies viewport dimensions immediately, bypassing the debounce.
    /// Used for the initial measurement a view starts from.
    pub fn set_viewport(&mut self, viewport: PxSize) {
        self.pending_viewport = Some(viewport);
        self.apply_pending_resize();
    }

    /// Applies the stashed dimensions after the quiet period elapsed.
    /// Returns true when a relayout actually ran.
    pub fn apply_pending_resize(&mut self) -> bool {
        let Some(viewport) = self.pending_viewport.take() else {
            return false;
        };
        debug!(
            "Applying viewport change: {}x{}",
            viewport.width.raw(),
            viewport.height.raw()
        );
        self.container_width = viewport.width.positive();
        self.scroll.set_viewport_height(viewport.height);
        self.config = breakpoints::resolve_config(self.container_width, self.args.gap);
        self.relayout();
        true
    }

    /// Opens the loading gate for one request. Returns the count already
    /// delivered (the request cursor), or `None` when a request is already
    /// outstanding or the collection is exhausted — the single-flight and
    /// ceiling guards live here, ahead of any request being issued.
    pub fn begin_load(&mut self) -> Option<usize> {
        if self.loading_more || self.exhausted {
            debug!(
                "Suppressing page request (loading_more={}, exhausted={})",
                self.loading_more, self.exhausted
            );
            return None;
        }
        self.loading_more = true;
        Some(self.items.len())
    }

    /// Releases the loading gate after the settle delay elapsed.
    pub fn settle_load(&mut self) {
        self.loading_more = false;
    }

    /// Releases the loading gate after a failed request so a later scroll
    /// can try again.
    pub fn abort_load(&mut self) {
        self.loading_more = false;
    }

    /// Appends a page, recomputes the layout atomically and schedules the
    /// settle deadline that will release the loading gate.
    ///
    /// Items violating the strictly-increasing id contract are dropped with
    /// a warning; the ceiling truncates oversized pages.
    pub fn handle_page(&mut self, page: Page, now: Instant, scheduler: &mut FrameScheduler) {
        let mut appended = 0usize;
        let mut last_id = self.items.last().map(|item| item.id);

        for item in page.items {
            if self.items.len() >= self.args.max_items {
                break;
            }
            if let Some(last) = last_id
                && item.id <= last
            {
                warn!("Dropping out-of-order item {:?} (last id {:?})", item.id, last);
                continue;
            }
            last_id = Some(item.id);
            self.index_by_id.insert(item.id, self.items.len());
            self.items.push(item);
            appended += 1;
        }

        if page.exhausted || self.items.len() >= self.args.max_items {
            self.exhausted = true;
        }
        if appended > 0 {
            self.relayout();
        }
        debug!(
            "Page applied: {appended} new items, {} total, exhausted={}",
            self.items.len(),
            self.exhausted
        );

        scheduler.schedule_settle(now, self.args.settle_delay);
        scheduler.request_window_pass();
    }

    /// Computes the indices of the items to materialize, reading the scroll
    /// state as of now.
    ///
    /// Re-invoking without intervening state changes yields the same set.
    /// Items without a position record are skipped, never reported.
    pub fn visible_indices(&self) -> Vec<usize> {
        let metrics = self.scroll.read();
        if metrics.viewport_height <= Px::ZERO {
            return Vec::new();
        }

        let range_start = metrics.offset.saturating_sub(self.args.buffer);
        let range_end = metrics.viewport_bottom().saturating_add(self.args.buffer);

        let mut visible = Vec::new();
        for index in 0..self.items.len() {
            let Some(position) = self.layout.positions.get(index) else {
                warn!("Position missing for item index {index}; skipping");
                continue;
            };
            // Greedy packing places each item at the current minimum lane
            // offset, so flattened tops never decrease: the first item that
            // starts below the window bounds every later one.
            if position.rect.top() > range_end {
                break;
            }
            if position.rect.bottom() < range_start {
                continue;
            }
            visible.push(index);
        }

        if visible.len() < self.args.min_visible_items
            && self.items.len() >= self.args.min_visible_items
        {
            debug!(
                "Geometric scan produced {} items; taking estimated window instead",
                visible.len()
            );
            return self.fallback_window(metrics);
        }
        visible
    }

    /// Estimated contiguous window used when the geometric scan degenerates
    /// (sparse tall columns, programmatic scroll jumps).
    fn fallback_window(&self, metrics: ScrollMetrics) -> Vec<usize> {
        let count = self.items.len();
        let window = self.args.min_visible_items.min(count);
        let estimated = (metrics.fraction() * count as f32).floor() as usize;
        let start = estimated.saturating_sub(window / 2).min(count - window);

        (start..start + window)
            .filter(|index| self.layout.positions.get(*index).is_some())
            .collect()
    }

    fn should_request_more(&self) -> bool {
        if self.loading_more || self.exhausted {
            return false;
        }
        let metrics = self.scroll.read();
        metrics
            .viewport_bottom()
            .saturating_add(self.args.load_threshold)
            >= self.layout.total_extent
    }

    fn relayout(&mut self) {
        let timer = Instant::now();
        let layout = masonry::compute_layout(&self.items, &self.config);
        self.scroll.set_content_extent(layout.total_extent);
        self.layout = Arc::new(layout);
        debug!(
            "Masonry layout recomputed: {} items, {} columns, extent {} in {:?}",
            self.layout.len(),
            self.layout.column_count,
            self.layout.total_extent.raw(),
            timer.elapsed()
        );
    }
}
