//! Test builders — ergonomic constructors for search states.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use kist_core::{SearchState, SortOrder};

// ---------------------------------------------------------------------------
// SearchStateBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`SearchState`] fixtures.
///
/// # Example
///
/// ```rust
/// let state = SearchStateBuilder::new("savaş ve barış")
///     .index("books-2020")
///     .years(1990, 2000)
///     .order(SortOrder::Asc)
///     .build();
/// ```
pub struct SearchStateBuilder {
    state: SearchState,
}

impl SearchStateBuilder {
    pub fn new(query: &str) -> Self {
        let mut state = SearchState::new(10);
        state.query = query.to_string();
        Self { state }
    }

    pub fn index(mut self, raw: &str) -> Self {
        self.state.index = raw.to_string();
        self
    }

    pub fn min_year(mut self, year: i32) -> Self {
        self.state.min_year = Some(year);
        self
    }

    pub fn max_year(mut self, year: i32) -> Self {
        self.state.max_year = Some(year);
        self
    }

    pub fn years(self, min: i32, max: i32) -> Self {
        self.min_year(min).max_year(max)
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.state.order = order;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.state.page_size = size;
        self
    }

    pub fn build(self) -> SearchState {
        self.state
    }
}
