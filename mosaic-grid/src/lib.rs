//! A virtualized masonry grid engine.
//!
//! `mosaic-grid` keeps interaction smooth over collections far larger than a
//! display can show — 15 000 items and up — by splitting the problem into
//! three cheap parts:
//!
//! - a pure **masonry pass** ([`masonry`]) turns the whole item sequence
//!   into absolute positions once per data or column change;
//! - a **windowing controller** ([`windowing`]) derives, per frame, the
//!   small position subset worth materializing, coalescing scroll storms
//!   into one recompute per frame and debouncing resize-driven relayouts;
//! - an **incremental loading protocol** ([`source`]) grows the collection
//!   page by page, single-flight, until the source drains or a hard ceiling
//!   is hit.
//!
//! Everything with I/O in it — fetching, decoding, placeholder rendering —
//! sits behind the [`media::ImageLoader`] boundary; the engine itself is
//! headless and single-threaded.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Instant;
//!
//! use mosaic_grid::{
//!     Px, PxSize,
//!     view::{MasonryView, MasonryViewArgs},
//! };
//! # fn host(source: impl mosaic_grid::source::DataSource,
//! #         loader: impl mosaic_grid::media::ImageLoader) {
//! let mut view = MasonryView::new(MasonryViewArgs::default(), source, loader)
//!     .expect("initial page");
//!
//! view.handle_resize(PxSize::new(Px(1280), Px(720)), Instant::now());
//! view.handle_scroll(Px(400));
//! let snapshot = view.run_frame(Instant::now());
//! for card in &snapshot.cards {
//!     // hand the card frames to your renderer
//!     let _ = (card.rect, &card.title, card.media);
//! }
//! # }
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod breakpoints;
pub mod card;
pub mod item;
pub mod masonry;
pub mod media;
pub mod scheduler;
pub mod scroll_state;
pub mod source;
pub mod view;
pub mod windowing;

pub use mosaic_foundation::{Px, PxPosition, PxRect, PxSize};

pub use crate::{
    card::{CardFrame, CardHooks},
    item::{GridItem, ImageRef, ItemId, PlaceholderToken},
    masonry::{MasonryConfig, MasonryLayout},
    source::{DataSource, Page, SourceError},
    view::{FrameSnapshot, MasonryView, MasonryViewArgs},
    windowing::{WindowingArgs, WindowingController},
};
