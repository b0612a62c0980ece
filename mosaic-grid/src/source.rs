//! The incremental loading boundary.
//!
//! A data source hands the engine an initial page and then further pages on
//! demand. The engine enforces single-flight (the controller's loading gate
//! precedes every request) and a hard item ceiling; everything else —
//! retries, backing storage, pagination mechanics — belongs to the source.

use thiserror::Error;

use crate::item::GridItem;

/// A finite batch of new items from a source.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// New items, ids strictly increasing and following every previously
    /// delivered id.
    pub items: Vec<GridItem>,
    /// True when the source has nothing further to deliver.
    pub exhausted: bool,
}

/// Errors a data source may surface when producing a page.
///
/// The engine treats these as transient: it logs, releases the loading gate
/// and lets a later near-end scroll trigger another attempt. Retry policy
/// itself stays with the source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source failed to produce the requested page.
    #[error("data source failed to produce page after {after_count} items: {reason}")]
    PageFailed {
        /// Number of items delivered before the failing request.
        after_count: usize,
        /// Source-specific failure description.
        reason: String,
    },
}

/// An ordered collection that can be grown page by page.
///
/// Implementors may be a static generator, a paginated API client or a local
/// dataset; the engine only sees ordered batches.
pub trait DataSource {
    /// Produces the first `count` items of the collection.
    fn initial_page(&mut self, count: usize) -> Result<Page, SourceError>;

    /// Produces up to `count` items following the first `after_count`.
    fn next_page(&mut self, after_count: usize, count: usize) -> Result<Page, SourceError>;
}
