#![allow(unused)]
//! Engine client integration harness.
//!
//! # What this covers
//!
//! This harness runs the real [`HttpBackend`] against the axum fake engine in
//! `common::fake_engine`, so every request crosses a real socket.
//!
//! - **Mount**: discovery selects the first visible index and the initial
//!   search targets it.
//! - **Load more**: the same query is re-sent with size 10, 20, 30.
//! - **Sort**: changing the order re-searches with the new sort and the same
//!   size; setting the same order sends nothing.
//! - **Failures**: a failed listing leaves the catalog empty and searches
//!   `_all`; a failed search keeps the previous results and records the error.
//! - **Ordering**: two overlapping searches are applied in the order they
//!   resolve, so the slower one wins.
//! - **Timeout**: a configured timeout turns a stalled search into an error.
//!
//! # Running
//!
//! ```sh
//! cargo test --test client_harness
//! ```

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::*;
use kist_core::{config::Config, ClientError, SortOrder};
use kist_engine::{execute, HttpBackend, SearchClient};
use pretty_assertions::assert_eq;

async fn engine_with_books(n: usize) -> FakeEngine {
    let engine = FakeEngine::start().await.unwrap();
    engine.add_hidden_index(".kibana").await;
    engine.add_hidden_index("articles-alerts").await;
    engine.add_index("books-2020", books(n)).await;
    engine.add_index("journals", books(3)).await;
    engine
}

fn client_for(engine: &FakeEngine, timeout: Option<Duration>) -> SearchClient<HttpBackend> {
    let mut config = Config::defaults();
    config.engine.base_url = engine.base_url();
    let backend = HttpBackend::new(&config.engine.base_url, timeout).unwrap();
    SearchClient::new(backend, &config)
}

// ---------------------------------------------------------------------------
// Mount and paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mount_searches_first_visible_index() {
    let engine = engine_with_books(35).await;
    let mut client = client_for(&engine, None);

    client.mount().await;

    let session = client.session();
    let raws: Vec<&str> = session
        .catalog()
        .entries
        .iter()
        .map(|e| e.raw.as_str())
        .collect();
    assert_eq!(raws, vec!["books-2020", "journals"]);
    assert_eq!(session.state().index, "books-2020");

    let results = session.results().unwrap();
    assert_eq!(results.total, 35);
    assert_eq!(results.hits.len(), 10);
    assert_eq!(results.hits[0].field(TITLE), Some("Kitap 0 (1 adet)"));
    assert!(session.has_more());
    assert_eq!(session.in_flight(), 0);

    let searches = engine.searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].index, "books-2020");
}

#[tokio::test]
async fn load_more_resends_with_growing_size() {
    let engine = engine_with_books(25).await;
    let mut client = client_for(&engine, None);
    client.mount().await;
    client.session_mut().set_query("kitap");
    client.search().await;
    client.load_more().await;
    client.load_more().await;

    let searches = engine.searches().await;
    let sizes: Vec<u64> = searches.iter().skip(1).map(|s| s.size()).collect();
    assert_eq!(sizes, vec![10, 20, 30]);
    for s in searches.iter().skip(1) {
        assert_eq!(s.body["query"]["function_score"]["functions"][0]["filter"]["match"][TITLE]["query"], "kitap");
    }

    let session = client.session();
    assert_eq!(session.results().unwrap().hits.len(), 25);
    assert!(!session.has_more());
}

#[tokio::test]
async fn all_indices_selection_hits_every_index() {
    let engine = engine_with_books(4).await;
    let mut client = client_for(&engine, None);
    client.discover().await;
    client.session_mut().select_index("");
    client.search().await;

    assert_eq!(engine.searches().await[0].index, "_all");
    assert_eq!(client.session().results().unwrap().total, 7);
}

#[tokio::test]
async fn order_change_re_searches_with_same_size() {
    let engine = engine_with_books(30).await;
    let mut client = client_for(&engine, None);
    client.mount().await;
    client.load_more().await;

    client.set_order(SortOrder::Desc).await;
    assert_eq!(engine.searches().await.len(), 2);

    client.set_order(SortOrder::Asc).await;
    let searches = engine.searches().await;
    assert_eq!(searches.len(), 3);
    let last = &searches[2];
    assert_eq!(last.size(), 20);
    assert_eq!(last.body["sort"][1][YEAR]["order"], "asc");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_listing_falls_back_to_all_indices() {
    let engine = engine_with_books(5).await;
    engine.fail_listing(StatusCode::SERVICE_UNAVAILABLE).await;
    let mut client = client_for(&engine, None);

    client.mount().await;

    assert!(client.session().catalog().is_empty());
    assert_eq!(engine.searches().await[0].index, "_all");
    assert!(client.session().results().is_some());
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let engine = engine_with_books(12).await;
    let mut client = client_for(&engine, None);
    client.mount().await;
    let before = client.session().results().unwrap().clone();

    engine.fail_search(Some(StatusCode::INTERNAL_SERVER_ERROR)).await;
    client.load_more().await;

    let session = client.session();
    assert!(matches!(session.last_error(), Some(ClientError::Search(_))));
    assert_eq!(session.results().unwrap(), &before);

    engine.fail_search(None).await;
    client.search().await;
    assert!(client.session().last_error().is_none());
}

#[tokio::test]
async fn unknown_index_is_a_search_error() {
    let engine = engine_with_books(3).await;
    let mut client = client_for(&engine, None);
    client.discover().await;
    client.session_mut().select_index("missing");
    client.search().await;
    assert!(client.session().last_error().is_some());
    assert!(client.session().results().is_none());
}

#[tokio::test]
async fn stalled_search_times_out() {
    let engine = engine_with_books(3).await;
    engine.delay_next_search(Duration::from_millis(500)).await;
    let mut client = client_for(&engine, Some(Duration::from_millis(50)));
    client.discover().await;
    client.search().await;

    let err = client.session().last_error().unwrap().to_string();
    assert!(err.contains("within"), "unexpected error: {err}");
}

// ---------------------------------------------------------------------------
// Overlapping searches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overlapping_searches_apply_in_resolution_order() {
    let engine = engine_with_books(30).await;
    let mut client = client_for(&engine, None);
    client.discover().await;
    let backend = client.backend().clone();

    // First request (size 10) is held; the second (size 20) answers at once.
    engine.delay_next_search(Duration::from_millis(150)).await;
    let slow = client.session_mut().submit();
    let fast = client.session_mut().load_more();
    assert_eq!(client.session().in_flight(), 2);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for ticket in [slow, fast] {
        let backend = backend.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = execute(&backend, &ticket.request).await;
            let _ = tx.send((ticket.seq, outcome));
        });
        // Keep arrival order at the engine deterministic.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some((seq, outcome)) = rx.recv().await {
        applied.push(seq);
        client.session_mut().apply_search(seq, outcome);
    }

    assert_eq!(applied, vec![1, 0]);
    let session = client.session();
    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.results().unwrap().hits.len(), 10);
}

#[tokio::test]
async fn concurrent_executes_share_one_backend() {
    let engine = engine_with_books(8).await;
    let mut client = client_for(&engine, None);
    client.discover().await;
    let a = client.session_mut().submit();
    let b = client.session_mut().refresh();

    let backend = client.backend();
    let (ra, rb) = futures::join!(execute(backend, &a.request), execute(backend, &b.request));
    assert_eq!(ra.unwrap().hits.len(), 8);
    assert_eq!(rb.unwrap().total, 8);
    assert_eq!(engine.searches().await.len(), 2);
}
