use std::ops::Range;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use shared::{domain::BrowseSummary, error::DexError, region::RegionDefinition};
use tracing::debug;

use crate::{normalize::load_summary, store::DexStore};

/// Every id in the region, ascending and stringified.
pub fn build_key_list(region: &RegionDefinition) -> Vec<String> {
    (region.lo..=region.hi).map(|id| id.to_string()).collect()
}

/// Slice of a `len`-long key list covered by page `cursor`.
pub fn page_bounds(len: usize, cursor: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = cursor.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn has_more(accumulated: usize, total: usize) -> bool {
    accumulated < total
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub summaries: Vec<BrowseSummary>,
    pub next_cursor: usize,
}

/// Fetches page `cursor` concurrently.
///
/// Summaries come back in key-list order whatever order the requests complete
/// in. One failed key fails the whole page.
pub async fn fetch_page(
    store: &DexStore,
    keys: &[String],
    cursor: usize,
    page_size: usize,
    with_preview: bool,
) -> Result<PageResult, DexError> {
    let bounds = page_bounds(keys.len(), cursor, page_size);
    debug!(
        "paginator: fetching cursor={cursor} keys={}..{} of {}",
        bounds.start,
        bounds.end,
        keys.len()
    );
    let summaries = try_join_all(
        keys[bounds]
            .iter()
            .map(|key| load_summary(store, key, with_preview)),
    )
    .await?;

    Ok(PageResult {
        summaries,
        next_cursor: cursor + 1,
    })
}

/// Region-scoped browse progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    pub region: Option<String>,
    pub keys: Vec<String>,
    pub summaries: Vec<BrowseSummary>,
    pub cursor: usize,
}

impl BrowseState {
    pub fn is_built_for(&self, region_key: &str) -> bool {
        self.region.as_deref() == Some(region_key)
    }

    /// Builds the key list unless it already belongs to `region`.
    pub fn ensure_keys(&mut self, region: &RegionDefinition) {
        if self.is_built_for(&region.key) {
            return;
        }
        self.region = Some(region.key.clone());
        self.keys = build_key_list(region);
        self.clear_progress();
    }

    /// Drops accumulated summaries but keeps the key list.
    pub fn clear_progress(&mut self) {
        self.summaries.clear();
        self.cursor = 0;
    }

    pub fn has_more(&self) -> bool {
        has_more(self.summaries.len(), self.keys.len())
    }

    pub fn append_page(&mut self, page: PageResult) {
        self.summaries.extend(page.summaries);
        self.cursor = page.next_cursor;
    }
}

#[cfg(test)]
#[path = "tests/paginator_tests.rs"]
mod tests;
