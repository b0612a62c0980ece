//! Visibility-gated media loading.
//!
//! A card shows its placeholder until it is actually materialized in the
//! window; only then is the full-resolution media requested. The engine
//! tracks a small phase machine per item — placeholder, requested, ready —
//! and delegates every byte of fetching and decoding to an [`ImageLoader`]
//! collaborator. Decoding inside the frame loop is exactly what this split
//! exists to prevent.
//!
//! Phases live in an LRU map: cards that scroll far away eventually lose
//! their entry and simply re-request when they come back, which mirrors the
//! lazy-load behavior of the media elements themselves.

use std::num::NonZeroUsize;

use lru::LruCache;
use thiserror::Error;
use tracing::warn;

use crate::item::{GridItem, ImageRef, ItemId};

const DEFAULT_TRACKED_ITEMS: usize = 512;

/// Loading phase of one item's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaPhase {
    /// Only the blur placeholder is available.
    #[default]
    Placeholder,
    /// The loader has been asked for the full media.
    Requested,
    /// The full media is decoded and ready to present.
    Ready,
}

/// Errors a loader may surface when a request cannot be started.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The loader rejected or failed the request.
    #[error("media request failed for {reference}: {reason}")]
    Request {
        /// The opaque reference the request was for.
        reference: String,
        /// Loader-specific failure description.
        reason: String,
    },
}

/// External collaborator that fetches and decodes media.
///
/// The engine only ever asks two questions: "start loading this" and "is it
/// ready yet". How the loader schedules, caches or progressively decodes is
/// its own business.
pub trait ImageLoader {
    /// Begins loading the referenced media. Called at most once per phase
    /// cycle for a given item.
    fn request(&mut self, image: &ImageRef) -> Result<(), LoadError>;

    /// True once the referenced media is decoded and presentable.
    fn is_ready(&self, image: &ImageRef) -> bool;
}

/// Per-item media phase bookkeeping for a view.
#[derive(Debug)]
pub struct MediaTracker {
    phases: LruCache<ItemId, MediaPhase>,
}

impl Default for MediaTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACKED_ITEMS)
    }
}

impl MediaTracker {
    /// Creates a tracker remembering phases for up to `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            phases: LruCache::new(capacity),
        }
    }

    /// Advances the phase machine for a materialized item and returns the
    /// phase a card should present this frame.
    ///
    /// Request failures degrade to the placeholder phase; the item retries
    /// the next time it is marked visible.
    pub fn mark_visible(&mut self, item: &GridItem, loader: &mut dyn ImageLoader) -> MediaPhase {
        let phase = self.phases.get(&item.id).copied().unwrap_or_default();
        let next = match phase {
            MediaPhase::Placeholder => match loader.request(&item.image) {
                Ok(()) => MediaPhase::Requested,
                Err(error) => {
                    warn!("{error}; keeping placeholder for item {:?}", item.id);
                    MediaPhase::Placeholder
                }
            },
            MediaPhase::Requested => {
                if loader.is_ready(&item.image) {
                    MediaPhase::Ready
                } else {
                    MediaPhase::Requested
                }
            }
            MediaPhase::Ready => MediaPhase::Ready,
        };
        self.phases.put(item.id, next);
        next
    }

    /// Returns the tracked phase without touching recency.
    pub fn phase(&self, id: ItemId) -> MediaPhase {
        self.phases.peek(&id).copied().unwrap_or_default()
    }
}
