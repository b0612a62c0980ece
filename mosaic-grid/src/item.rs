//! The item model fed into the layout and windowing layers.
//!
//! Items are immutable once created: a data source appends them in id order
//! and nothing downstream ever mutates one. Media references and placeholder
//! tokens are opaque here — fetching, decoding and blur rendering all live
//! behind the [`ImageLoader`](crate::media::ImageLoader) boundary.

use std::sync::Arc;

use mosaic_foundation::Px;

/// Stable identifier of a grid item.
///
/// Ids are unique for the lifetime of a collection and never reused. Sources
/// produce them strictly increasing, so id order equals sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

/// Opaque handle to an item's full-resolution media.
///
/// The engine never inspects the contents; it only forwards the handle to an
/// [`ImageLoader`](crate::media::ImageLoader).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Wraps an opaque media reference.
    pub fn new(reference: impl Into<Arc<str>>) -> Self {
        Self(reference.into())
    }

    /// Returns the raw reference for handing to a loader.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque pre-encoded low-fidelity stand-in shown before the full media
/// arrives. Produced out-of-band together with the item; never parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderToken(Arc<str>);

impl PlaceholderToken {
    /// Wraps an encoded placeholder token.
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Returns the encoded token for a placeholder renderer.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry of the grid collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    /// Stable identifier, strictly increasing in sequence order.
    pub id: ItemId,
    /// Display title.
    pub title: Arc<str>,
    /// Category label shown on the card.
    pub category: Arc<str>,
    /// Opaque handle to the full-resolution media.
    pub image: ImageRef,
    /// Fixed height the item occupies once placed, in physical pixels.
    /// Always positive; measured up front, never re-measured.
    pub intrinsic_height: Px,
    /// Opaque blur placeholder token.
    pub placeholder: PlaceholderToken,
}
