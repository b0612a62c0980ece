//! Foundation primitives for the mosaic grid engine.
//!
//! Everything the engine measures is expressed in physical pixels. This crate
//! provides the [`Px`] newtype together with the small set of 2D helpers
//! ([`PxPosition`], [`PxSize`], [`PxRect`]) that the layout and windowing
//! layers build on. It deliberately has no dependencies.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod px;

pub use px::{Px, PxPosition, PxRect, PxSize};
