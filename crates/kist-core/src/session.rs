//! Session — the search client's in-memory state machine.
//!
//! The session owns the [`SearchState`], the discovered [`IndexCatalog`], the
//! current [`ResultSet`] and the per-field [`ExpansionState`]. It performs no
//! I/O: operations that need a search return a [`Ticket`], the caller runs it
//! against the engine, and feeds the outcome back through
//! [`Session::apply_search`].
//!
//! Outcomes are applied in the order they arrive. Overlapping searches are
//! not cancelled, so a slow older response can overwrite a newer one; that
//! case is logged but left as is.

use crate::error::ClientError;
use crate::pager;
use crate::present::ExpansionState;
use crate::query::{self, SearchRequest};
use crate::types::{FieldNames, IndexCatalog, ResultSet, SearchState, SortOrder};

/// A dispatched search: its sequence number and the request to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seq: u64,
    pub request: SearchRequest,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SearchState,
    catalog: IndexCatalog,
    results: Option<ResultSet>,
    expansion: ExpansionState,
    last_error: Option<ClientError>,
    fields: FieldNames,
    page_step: usize,
    next_seq: u64,
    newest_applied: Option<u64>,
    in_flight: usize,
}

impl Session {
    pub fn new(fields: FieldNames, page_step: usize) -> Self {
        Self {
            state: SearchState::new(page_step),
            catalog: IndexCatalog::default(),
            results: None,
            expansion: ExpansionState::default(),
            last_error: None,
            fields,
            page_step,
            next_seq: 0,
            newest_applied: None,
            in_flight: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    /// `None` until the first search succeeds.
    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub fn has_more(&self) -> bool {
        self.results.as_ref().is_some_and(pager::has_more)
    }

    // ── Input handlers (no search) ────────────────────────────────────────

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    /// Select an index by raw name; empty selects all indices.
    pub fn select_index(&mut self, raw: impl Into<String>) {
        self.state.index = raw.into();
        tracing::debug!(index = %self.state.index, "session: index selected");
    }

    pub fn set_min_year(&mut self, year: Option<i32>) {
        self.state.min_year = year;
    }

    pub fn set_max_year(&mut self, year: Option<i32>) {
        self.state.max_year = year;
    }

    /// Set the year order without searching, for callers that are about to
    /// search anyway (headless mode sets it before the first request).
    pub fn preset_order(&mut self, order: SortOrder) {
        self.state.order = order;
    }

    // ── Search triggers ───────────────────────────────────────────────────

    /// An explicit search from the first page.
    pub fn submit(&mut self) -> Ticket {
        self.state.reset_pages(self.page_step);
        self.dispatch()
    }

    /// Widen the window by one page and re-run the same query.
    pub fn load_more(&mut self) -> Ticket {
        self.state.load_more(self.page_step);
        self.dispatch()
    }

    /// Change the year tie-break order. Re-searches only if it changed.
    pub fn set_order(&mut self, order: SortOrder) -> Option<Ticket> {
        if self.state.order == order {
            return None;
        }
        self.state.order = order;
        tracing::debug!(order = %order, "session: sort order changed");
        Some(self.dispatch())
    }

    /// Re-run the current state unchanged (used for the initial search).
    pub fn refresh(&mut self) -> Ticket {
        self.dispatch()
    }

    fn dispatch(&mut self) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;
        let request = query::build(&self.state, &self.fields);
        tracing::debug!(
            seq,
            path = %request.path(),
            size = request.size,
            in_flight = self.in_flight,
            "session: search dispatched"
        );
        Ticket { seq, request }
    }

    // ── Outcomes ──────────────────────────────────────────────────────────

    /// Install the discovered catalog and default the selection to its first
    /// entry. On failure the catalog stays empty and searches target all
    /// indices.
    pub fn apply_catalog(&mut self, outcome: Result<IndexCatalog, ClientError>) {
        match outcome {
            Ok(catalog) => {
                if let Some(first) = catalog.first() {
                    self.state.index = first.raw.clone();
                }
                tracing::debug!(
                    count = catalog.len(),
                    selected = %self.state.index,
                    "session: catalog installed"
                );
                self.catalog = catalog;
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching indices");
                self.catalog = IndexCatalog::default();
                self.last_error = Some(err);
            }
        }
    }

    /// Apply a search outcome. Success replaces the result set and discards
    /// expansion flags; failure keeps stale results and records the error.
    pub fn apply_search(&mut self, seq: u64, outcome: Result<ResultSet, ClientError>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if let Some(newest) = self.newest_applied {
            if seq < newest {
                tracing::warn!(seq, newest, "session: applying out-of-order search response");
            }
        }
        self.newest_applied = Some(self.newest_applied.map_or(seq, |n| n.max(seq)));

        match outcome {
            Ok(results) => {
                tracing::debug!(
                    seq,
                    total = results.total,
                    shown = results.hits.len(),
                    "session: results applied"
                );
                self.results = Some(results);
                self.expansion.clear();
                self.last_error = None;
            }
            Err(err) => {
                tracing::error!(seq, error = %err, "error fetching data from search engine");
                self.last_error = Some(err);
            }
        }
    }

    // ── Presentation state ────────────────────────────────────────────────

    pub fn toggle_field(&mut self, doc_id: &str, field: &str) -> bool {
        self.expansion.toggle(doc_id, field)
    }

    pub fn is_expanded(&self, doc_id: &str, field: &str) -> bool {
        self.expansion.is_expanded(doc_id, field)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
