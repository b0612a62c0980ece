//! Headless demo: drives a masonry view through a scripted scroll session
//! over a 15 000-item synthetic collection and logs what gets materialized.
//!
//! Run with `RUST_LOG=debug` to watch the relayout and paging activity.

mod sample_data;

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use mosaic_foundation::{Px, PxSize};
use mosaic_grid::{
    card::CardHooks,
    item::{ImageRef, ItemId},
    media::{ImageLoader, LoadError},
    view::{MasonryView, MasonryViewArgs},
};
use tracing::info;

use crate::sample_data::SampleSource;

const COLLECTION_SIZE: usize = 15_000;
const FRAME: Duration = Duration::from_millis(16);
const SESSION_FRAMES: u32 = 600;
const SCROLL_PER_FRAME: Px = Px(220);

/// Loader stand-in: everything it is asked for is "decoded" one frame later.
#[derive(Default)]
struct InstantLoader {
    decoded: HashSet<String>,
}

impl ImageLoader for InstantLoader {
    fn request(&mut self, image: &ImageRef) -> Result<(), LoadError> {
        self.decoded.insert(image.as_str().to_owned());
        Ok(())
    }

    fn is_ready(&self, image: &ImageRef) -> bool {
        self.decoded.contains(image.as_str())
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let hooks = CardHooks::default()
        .on_request_preview(Arc::new(|id: ItemId| info!("Preview requested for {id:?}"))
            as Arc<dyn Fn(ItemId) + Send + Sync>);
    let args = MasonryViewArgs::default().hooks(hooks);

    let mut view = match MasonryView::new(args, SampleSource::new(COLLECTION_SIZE), InstantLoader::default()) {
        Ok(view) => view,
        Err(error) => {
            eprintln!("failed to load the initial page: {error}");
            return;
        }
    };

    let start = Instant::now();
    view.handle_resize(PxSize::new(Px(1536), Px(820)), start);

    let mut offset = Px::ZERO;
    let mut peak_cards = 0usize;

    for frame in 0..SESSION_FRAMES {
        let now = start + FRAME * frame;

        // A fling delivers several scroll events per display refresh; only
        // the latest offset matters to the recompute.
        for step in 1..=3 {
            view.handle_scroll(offset.saturating_add(SCROLL_PER_FRAME / 3 * step));
        }
        offset = offset.saturating_add(SCROLL_PER_FRAME);

        let snapshot = view.run_frame(now);
        peak_cards = peak_cards.max(snapshot.cards.len());

        if frame % 60 == 0 {
            info!(
                "frame {frame:>3}: first card at y {:>7}, {:>3} cards live, {:>5} items loaded, extent {:>7}{}",
                snapshot
                    .cards
                    .first()
                    .map(|card| card.rect.top().raw())
                    .unwrap_or(0),
                snapshot.cards.len(),
                view.controller().item_count(),
                snapshot.total_extent.raw(),
                if snapshot.loading_more { " (loading)" } else { "" },
            );
        }
    }

    let final_count = view.controller().item_count();
    view.teardown();

    info!(
        "Session done: scrolled {SESSION_FRAMES} frames, grew the collection to {final_count} \
         items, never materialized more than {peak_cards} cards at once"
    );
}
