//! The container shell hosts drive.
//!
//! [`MasonryView`] owns the data source, the image loader, the windowing
//! controller and the scheduler, and exposes the three entry points a host
//! environment wires up: scroll signals, resize signals and a per-frame
//! tick. Each tick settles due deferrals, rebuilds the materialized card
//! set if (and only if) a window pass is pending, and finally drains the
//! low-priority load slot so page requests never delay the frame's visual
//! update.

use std::time::Instant;

use derive_setters::Setters;
use mosaic_foundation::{Px, PxSize};
use tracing::{debug, warn};

use crate::{
    card::{CardFrame, CardHooks, card_frame},
    media::{ImageLoader, MediaTracker},
    scheduler::FrameScheduler,
    source::{DataSource, SourceError},
    windowing::{WindowingArgs, WindowingController},
};

const DEFAULT_INITIAL_COUNT: usize = 500;
const DEFAULT_PAGE_SIZE: usize = 200;
const DEFAULT_VIEWPORT: PxSize = PxSize::new(Px(1200), Px(800));

/// Arguments for constructing a [`MasonryView`].
#[derive(Debug, Clone, Setters)]
pub struct MasonryViewArgs {
    /// Windowing tunables passed through to the controller.
    pub windowing: WindowingArgs,
    /// Viewport dimensions to start from, before the first real resize
    /// signal arrives.
    pub initial_viewport: PxSize,
    /// Items requested from the source up front.
    pub initial_count: usize,
    /// Items requested per subsequent page.
    pub page_size: usize,
    /// Host capabilities handed to cards.
    pub hooks: CardHooks,
}

impl Default for MasonryViewArgs {
    fn default() -> Self {
        Self {
            windowing: WindowingArgs::default(),
            initial_viewport: DEFAULT_VIEWPORT,
            initial_count: DEFAULT_INITIAL_COUNT,
            page_size: DEFAULT_PAGE_SIZE,
            hooks: CardHooks::default(),
        }
    }
}

/// One frame's output: everything the host needs to draw.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    /// Materialized cards, in item sequence order.
    pub cards: Vec<CardFrame>,
    /// Total vertical extent of the content, for sizing the scroll range.
    pub total_extent: Px,
    /// True while a page request is outstanding or settling; hosts show
    /// their loading affordance off this.
    pub loading_more: bool,
    /// True once no further pages will ever arrive.
    pub exhausted: bool,
}

/// The scrollable masonry container.
pub struct MasonryView<S, L> {
    args: MasonryViewArgs,
    source: S,
    loader: L,
    controller: WindowingController,
    scheduler: FrameScheduler,
    media: MediaTracker,
    cards: Vec<CardFrame>,
    torn_down: bool,
}

impl<S: DataSource, L: ImageLoader> MasonryView<S, L> {
    /// Builds a view, pulling and laying out the initial page.
    pub fn new(args: MasonryViewArgs, mut source: S, loader: L) -> Result<Self, SourceError> {
        let mut controller = WindowingController::new(args.windowing.clone());
        let mut scheduler = FrameScheduler::new();
        controller.set_viewport(args.initial_viewport);

        let initial = source.initial_page(args.initial_count)?;
        controller.handle_page(initial, Instant::now(), &mut scheduler);

        Ok(Self {
            args,
            source,
            loader,
            controller,
            scheduler,
            media: MediaTracker::default(),
            cards: Vec::new(),
            torn_down: false,
        })
    }

    /// Handles a scroll signal at native event rate. Cheap: commits the
    /// offset, coalesces the recompute, possibly arms the load slot.
    pub fn handle_scroll(&mut self, offset: Px) {
        if self.torn_down {
            return;
        }
        self.controller.note_scroll(offset, &mut self.scheduler);
    }

    /// Handles a resize signal at native event rate. The expensive layout
    /// recompute waits for a 300 ms quiet period.
    pub fn handle_resize(&mut self, viewport: PxSize, now: Instant) {
        if self.torn_down {
            return;
        }
        self.controller
            .note_resize(viewport, now, &mut self.scheduler);
    }

    /// Runs one frame: settles due deferrals, rebuilds the card set when a
    /// window pass is pending, then drains the low-priority load slot.
    pub fn run_frame(&mut self, now: Instant) -> FrameSnapshot {
        if self.torn_down {
            return FrameSnapshot::default();
        }

        // The debounced relayout changes what the window pass would see, so
        // it settles first.
        if self.scheduler.take_due_relayout(now)
            && self.controller.apply_pending_resize()
        {
            self.scheduler.request_window_pass();
        }

        if self.scheduler.take_due_settle(now) {
            self.controller.settle_load();
        }

        if self.scheduler.take_window_pass() {
            self.rebuild_cards();
        }

        let snapshot = FrameSnapshot {
            cards: self.cards.clone(),
            total_extent: self.controller.layout().total_extent,
            loading_more: self.controller.is_loading_more(),
            exhausted: self.controller.is_exhausted(),
        };

        if self.scheduler.take_load_request() {
            self.request_next_page(now);
        }

        snapshot
    }

    /// Cancels all pending deferred work. After this the view never mutates
    /// state again; further signals and frames are no-ops.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.cards.clear();
        self.torn_down = true;
    }

    /// The underlying controller, for host-side inspection.
    pub fn controller(&self) -> &WindowingController {
        &self.controller
    }

    /// The capabilities cards were constructed with.
    pub fn hooks(&self) -> &CardHooks {
        &self.args.hooks
    }

    /// Reads the materialized window and rebuilds the card frames,
    /// advancing each visible item's media phase.
    fn rebuild_cards(&mut self) {
        let layout = self.controller.layout();
        let indices = self.controller.visible_indices();

        let mut cards = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(item) = self.controller.items().get(index) else {
                continue;
            };
            let Some(position) = layout.positions.get(index) else {
                warn!("Position missing for item {:?}; card skipped", item.id);
                continue;
            };
            let phase = self.media.mark_visible(item, &mut self.loader);
            cards.push(card_frame(item, position, phase));
        }
        self.cards = cards;
    }

    /// Issues the next page request, gated single-flight by the controller.
    fn request_next_page(&mut self, now: Instant) {
        let Some(after_count) = self.controller.begin_load() else {
            return;
        };
        debug!("Requesting next page after {after_count} items");
        match self.source.next_page(after_count, self.args.page_size) {
            Ok(page) => self
                .controller
                .handle_page(page, now, &mut self.scheduler),
            Err(error) => {
                warn!("{error}; releasing the loading gate");
                self.controller.abort_load();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{GridItem, ImageRef, ItemId, PlaceholderToken};
    use crate::media::LoadError;
    use crate::source::Page;
    use std::sync::Arc;
    use std::time::Duration;

    const HEIGHTS: [i32; 5] = [240, 300, 380, 240, 480];

    struct ScriptedSource {
        total: usize,
        fail_next: bool,
    }

    impl ScriptedSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_next: false,
            }
        }

        fn batch(&self, start: usize, count: usize) -> Page {
            let end = (start + count).min(self.total);
            let items = (start..end)
                .map(|i| GridItem {
                    id: ItemId(i as u64 + 1),
                    title: Arc::from(format!("Item {}", i + 1)),
                    category: Arc::from("Design"),
                    image: ImageRef::new(format!("media/{}", i + 1)),
                    intrinsic_height: Px(HEIGHTS[i % HEIGHTS.len()]),
                    placeholder: PlaceholderToken::new("L6PZfSjE.AyE_3t7t7R**0o#DgR4"),
                })
                .collect();
            Page {
                items,
                exhausted: end >= self.total,
            }
        }
    }

    impl DataSource for ScriptedSource {
        fn initial_page(&mut self, count: usize) -> Result<Page, SourceError> {
            Ok(self.batch(0, count))
        }

        fn next_page(&mut self, after_count: usize, count: usize) -> Result<Page, SourceError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(SourceError::PageFailed {
                    after_count,
                    reason: "socket closed".into(),
                });
            }
            Ok(self.batch(after_count, count))
        }
    }

    #[derive(Default)]
    struct CountingLoader {
        requests: usize,
    }

    impl ImageLoader for CountingLoader {
        fn request(&mut self, _image: &ImageRef) -> Result<(), LoadError> {
            self.requests += 1;
            Ok(())
        }

        fn is_ready(&self, _image: &ImageRef) -> bool {
            true
        }
    }

    fn view(total: usize) -> MasonryView<ScriptedSource, CountingLoader> {
        MasonryView::new(
            MasonryViewArgs::default(),
            ScriptedSource::new(total),
            CountingLoader::default(),
        )
        .expect("initial page")
    }

    #[test]
    fn test_first_frame_materializes_cards() {
        let mut view = view(2000);
        let snapshot = view.run_frame(Instant::now());

        assert!(!snapshot.cards.is_empty());
        assert!(snapshot.total_extent > Px::ZERO);
        assert!(!snapshot.exhausted);
        // Well under the full collection: windowing is doing its job.
        assert!(snapshot.cards.len() < view.controller().item_count());
    }

    #[test]
    fn test_scroll_storm_coalesces_to_one_rebuild() {
        let mut view = view(2000);
        let _ = view.run_frame(Instant::now());
        let after_first = view.loader.requests;

        for offset in (0..100).map(|i| Px(i * 37)) {
            view.handle_scroll(offset);
        }
        let _ = view.run_frame(Instant::now());
        let after_storm = view.loader.requests;

        // An idle frame does not rebuild the window or touch the loader.
        let _ = view.run_frame(Instant::now());
        assert_eq!(view.loader.requests, after_storm);
        assert!(after_storm >= after_first);
    }

    #[test]
    fn test_window_pass_reads_latest_offset() {
        // Keep the estimated fallback out of the way so every card comes
        // from the geometric scan.
        let args = MasonryViewArgs::default()
            .windowing(crate::windowing::WindowingArgs::default().min_visible_items(1));
        let mut view = MasonryView::new(args, ScriptedSource::new(5000), CountingLoader::default())
            .expect("initial page");
        let _ = view.run_frame(Instant::now());

        view.handle_scroll(Px(200));
        view.handle_scroll(Px(9000));
        let snapshot = view.run_frame(Instant::now());

        let metrics = view.controller().scroll_state().read();
        assert_eq!(metrics.offset, Px(9000));
        // Every materialized card sits within the buffered window around
        // the *latest* offset, not the first one.
        let buffer = Px(1200);
        for card in &snapshot.cards {
            assert!(card.rect.bottom() >= metrics.offset.saturating_sub(buffer));
            assert!(card.rect.top() <= metrics.viewport_bottom().saturating_add(buffer));
        }
    }

    #[test]
    fn test_near_end_scroll_loads_next_page() {
        let mut view = view(2000);
        let t0 = Instant::now();
        let _ = view.run_frame(t0);
        let before = view.controller().item_count();

        let extent = view.controller().layout().total_extent;
        view.handle_scroll(extent);
        let _ = view.run_frame(t0);

        assert_eq!(view.controller().item_count(), before + 200);
        assert!(view.controller().is_loading_more());

        // Gate stays closed until the settle delay elapses, so a second
        // near-end scroll does not stack a request.
        view.handle_scroll(view.controller().layout().total_extent);
        let _ = view.run_frame(t0 + Duration::from_millis(10));
        assert_eq!(view.controller().item_count(), before + 200);

        // After settling, the next near-end scroll loads again.
        let _ = view.run_frame(t0 + Duration::from_millis(1100));
        assert!(!view.controller().is_loading_more());
        view.handle_scroll(view.controller().layout().total_extent);
        let _ = view.run_frame(t0 + Duration::from_millis(1200));
        assert_eq!(view.controller().item_count(), before + 400);
    }

    #[test]
    fn test_source_failure_releases_gate_for_retry() {
        let mut view = view(2000);
        let t0 = Instant::now();
        let _ = view.run_frame(t0);
        view.source.fail_next = true;

        let extent = view.controller().layout().total_extent;
        view.handle_scroll(extent);
        let _ = view.run_frame(t0);
        assert_eq!(view.controller().item_count(), 500);
        assert!(!view.controller().is_loading_more());

        view.handle_scroll(view.controller().layout().total_extent);
        let _ = view.run_frame(t0 + Duration::from_millis(20));
        assert_eq!(view.controller().item_count(), 700);
    }

    #[test]
    fn test_source_exhaustion_stops_loading() {
        let mut view = view(600);
        let t0 = Instant::now();
        let _ = view.run_frame(t0);

        view.handle_scroll(view.controller().layout().total_extent);
        let snapshot = view.run_frame(t0);
        assert!(!snapshot.exhausted);

        let snapshot = view.run_frame(t0 + Duration::from_millis(1100));
        assert!(snapshot.exhausted);
        assert_eq!(view.controller().item_count(), 600);

        // Exhausted: further near-end scrolls never issue a request.
        view.handle_scroll(view.controller().layout().total_extent);
        let _ = view.run_frame(t0 + Duration::from_millis(1200));
        assert_eq!(view.controller().item_count(), 600);
    }

    #[test]
    fn test_resize_applies_after_quiet_period() {
        let mut view = view(1000);
        let t0 = Instant::now();
        let _ = view.run_frame(t0);
        assert_eq!(view.controller().config().column_count, 3);

        view.handle_resize(PxSize::new(Px(1600), Px(900)), t0);
        let _ = view.run_frame(t0 + Duration::from_millis(100));
        assert_eq!(view.controller().config().column_count, 3);

        let _ = view.run_frame(t0 + Duration::from_millis(400));
        assert_eq!(view.controller().config().column_count, 4);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut view = view(2000);
        let t0 = Instant::now();
        let _ = view.run_frame(t0);

        view.handle_scroll(view.controller().layout().total_extent);
        view.teardown();

        let snapshot = view.run_frame(t0);
        assert!(snapshot.cards.is_empty());
        let before = view.controller().item_count();
        let _ = view.run_frame(t0 + Duration::from_secs(5));
        assert_eq!(view.controller().item_count(), before);

        view.handle_scroll(Px(10));
        view.handle_resize(PxSize::new(Px(640), Px(480)), t0);
        let _ = view.run_frame(t0 + Duration::from_secs(6));
        assert_eq!(view.controller().config().column_count, 3);
    }
}
