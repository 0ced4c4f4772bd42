//! Page fetcher seam and load results

use async_trait::async_trait;

/// One page of items as reported by the backend
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total_items: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: usize, has_more: bool) -> Self {
        Self {
            items,
            total_items,
            has_more,
        }
    }
}

/// Retrieves pages from the backend.
///
/// `page` is 1-indexed. The scroller requests pages in increasing order and
/// never has more than one request in flight.
#[async_trait(?Send)]
pub trait PageFetcher<T> {
    async fn fetch_page(&self, page: u32, page_size: usize) -> Result<Page<T>, String>;
}

/// Why a load request did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch holds the loading flag
    AlreadyLoading,
    /// The backend reported no further pages
    Exhausted,
    /// The view was disposed
    Disposed,
    /// The result arrived after a reset or was superseded by a newer fetch
    Stale,
}

/// Result of a load request that did not fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: u32, count: usize },
    Skipped(SkipReason),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}
