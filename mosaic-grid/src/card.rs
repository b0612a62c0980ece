//! Stateless card presentation.
//!
//! A [`CardFrame`] is the complete description of one materialized item for
//! one frame: where it sits, what caption it carries and which media phase
//! to present. Hosts turn frames into whatever their rendering substrate
//! wants; the engine never retains them across frames.
//!
//! Transient per-card interaction (hover, the preview overlay) is kept out
//! of the windowing path entirely: a [`CardState`] lives host-side and talks
//! back through the [`CardHooks`] capability interface.

use std::sync::Arc;

use derive_setters::Setters;
use mosaic_foundation::PxRect;

use crate::{
    item::{GridItem, ItemId, PlaceholderToken},
    masonry::ItemPosition,
    media::MediaPhase,
};

/// Everything a host needs to draw one card this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFrame {
    /// The item this frame presents.
    pub id: ItemId,
    /// Absolute placement rectangle from the committed layout.
    pub rect: PxRect,
    /// Display title.
    pub title: Arc<str>,
    /// Category badge text.
    pub category: Arc<str>,
    /// Which media representation to present.
    pub media: MediaPhase,
    /// Placeholder token to decode while `media` is not ready.
    pub placeholder: PlaceholderToken,
}

/// Builds the frame for one positioned item.
pub fn card_frame(item: &GridItem, position: &ItemPosition, media: MediaPhase) -> CardFrame {
    CardFrame {
        id: item.id,
        rect: position.rect,
        title: item.title.clone(),
        category: item.category.clone(),
        media,
        placeholder: item.placeholder.clone(),
    }
}

/// Capabilities a card may invoke, provided by the host.
///
/// Both hooks are optional; an absent hook makes the matching gesture a
/// no-op.
#[derive(Clone, Default, Setters)]
#[setters(strip_option)]
pub struct CardHooks {
    /// Invoked when the user asks to preview an item fullscreen.
    pub on_request_preview: Option<Arc<dyn Fn(ItemId) + Send + Sync>>,
    /// Invoked when the user triggers the card's primary action.
    pub on_request_action: Option<Arc<dyn Fn(ItemId) + Send + Sync>>,
}

impl std::fmt::Debug for CardHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardHooks")
            .field("on_request_preview", &self.on_request_preview.is_some())
            .field("on_request_action", &self.on_request_action.is_some())
            .finish()
    }
}

/// Host-side transient state for a single card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    /// True while the pointer is over the card.
    pub hovered: bool,
    /// True while the preview overlay for this card is open.
    pub preview_open: bool,
}

impl CardState {
    /// Records pointer entry or exit.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Handles the preview gesture: flips the overlay flag and notifies the
    /// host.
    pub fn request_preview(&mut self, id: ItemId, hooks: &CardHooks) {
        self.preview_open = true;
        if let Some(hook) = &hooks.on_request_preview {
            hook(id);
        }
    }

    /// Handles the primary-action gesture.
    pub fn request_action(&self, id: ItemId, hooks: &CardHooks) {
        if let Some(hook) = &hooks.on_request_action {
            hook(id);
        }
    }

    /// Closes the preview overlay.
    pub fn close_preview(&mut self) {
        self.preview_open = false;
    }
}
