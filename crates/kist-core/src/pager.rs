//! Result pager — "load more" by growing the requested window.
//!
//! There is no cursor: each page re-runs the same query from offset 0 with a
//! larger `size`, and the engine re-ranks the whole window.

use crate::types::{ResultSet, SearchState};

/// Default growth per "load more".
pub const PAGE_STEP: usize = 10;

impl SearchState {
    /// Grow the window by one step.
    pub fn load_more(&mut self, step: usize) {
        self.page_size += step;
        tracing::debug!(page_size = self.page_size, "pager: load more");
    }

    /// Back to the first page, for a fresh explicit search.
    pub fn reset_pages(&mut self, step: usize) {
        self.page_size = step;
    }
}

/// Whether the engine reported more matches than are currently shown.
pub fn has_more(results: &ResultSet) -> bool {
    results.total > results.hits.len() as u64
}
