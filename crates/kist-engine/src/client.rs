//! Async search operations and the [`SearchClient`] driver.
//!
//! [`discover`] and [`execute`] are free functions so the TUI can spawn them
//! on its runtime and hand the outcome back to its own [`Session`].
//! [`SearchClient`] strings them together for sequential callers (headless
//! mode, tests).

use kist_core::{
    catalog::{self, CatalogRules},
    config::Config,
    query::SearchRequest,
    response, ClientError, IndexCatalog, ResultSet, Session, SortOrder, Ticket,
};

use crate::backend::Backend;

/// Fetch and parse the index listing.
pub async fn discover<B: Backend>(
    backend: &B,
    rules: &CatalogRules,
) -> Result<IndexCatalog, ClientError> {
    let listing = backend
        .cat_indices()
        .await
        .map_err(ClientError::discovery)?;
    catalog::parse_listing(&listing, rules)
}

/// Run one search request and decode the hits.
pub async fn execute<B: Backend>(
    backend: &B,
    request: &SearchRequest,
) -> Result<ResultSet, ClientError> {
    let body = backend
        .search(&request.path(), &request.body)
        .await
        .map_err(ClientError::search)?;
    response::parse(&body, request.size)
}

/// A [`Session`] bound to a backend, with each operation awaited to completion.
pub struct SearchClient<B> {
    backend: B,
    rules: CatalogRules,
    session: Session,
}

impl<B: Backend> SearchClient<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            backend,
            rules: config.catalog.rules(),
            session: Session::new(config.engine.fields(), config.ui.page_step),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Startup: discover indices, then run the initial search against the
    /// default selection.
    pub async fn mount(&mut self) {
        self.discover().await;
        let ticket = self.session.refresh();
        self.run(ticket).await;
    }

    pub async fn discover(&mut self) {
        let outcome = discover(&self.backend, &self.rules).await;
        self.session.apply_catalog(outcome);
    }

    /// Explicit search from the first page.
    pub async fn search(&mut self) {
        let ticket = self.session.submit();
        self.run(ticket).await;
    }

    pub async fn load_more(&mut self) {
        let ticket = self.session.load_more();
        self.run(ticket).await;
    }

    /// Change the sort order; re-searches when it actually changed.
    pub async fn set_order(&mut self, order: SortOrder) {
        if let Some(ticket) = self.session.set_order(order) {
            self.run(ticket).await;
        }
    }

    async fn run(&mut self, ticket: Ticket) {
        let outcome = execute(&self.backend, &ticket.request).await;
        self.session.apply_search(ticket.seq, outcome);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
