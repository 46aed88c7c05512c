//! Fake search engine for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /_cat/indices` — whitespace-aligned listing with a header row
//! - `POST /{index}/_search` — the stored documents of `index` (every index
//!   for `_all`), cut to the request's `size`
//!
//! Every search body is recorded so tests can assert on what the client sent.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! use common::fake_engine::FakeEngine;
//!
//! let engine = FakeEngine::start().await.unwrap();
//! engine.add_index("books-2020", common::books(35)).await;
//!
//! // Point the client at engine.base_url()
//! let url = engine.base_url();
//! # }
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One search the fake engine received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    pub index: String,
    pub body: Value,
}

impl RecordedSearch {
    pub fn size(&self) -> u64 {
        self.body["size"].as_u64().unwrap_or_default()
    }
}

/// State shared between the router and test code.
#[derive(Default)]
struct EngineState {
    /// `(name, documents)` in listing order. Documents are `{_id, _source}`.
    indices: Vec<(String, Vec<Value>)>,
    /// Listed by `_cat/indices` but never searchable (system, alerts, ...).
    hidden: Vec<String>,
    searches: Vec<RecordedSearch>,
    fail_listing: Option<StatusCode>,
    fail_search: Option<StatusCode>,
    /// Applied to the next searches in arrival order.
    delays: VecDeque<Duration>,
}

/// Handle to the running fake engine.
pub struct FakeEngine {
    addr: SocketAddr,
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    /// Start the fake engine on a random port. Returns once the server is
    /// listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(EngineState::default()));

        let app = Router::new()
            .route("/_cat/indices", get(cat_indices))
            .route("/{index}/_search", post(search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the engine (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn add_index(&self, name: &str, docs: Vec<Value>) {
        self.state.lock().await.indices.push((name.to_string(), docs));
    }

    /// List a name in `_cat/indices` without making it searchable.
    pub async fn add_hidden_index(&self, name: &str) {
        self.state.lock().await.hidden.push(name.to_string());
    }

    pub async fn fail_listing(&self, status: StatusCode) {
        self.state.lock().await.fail_listing = Some(status);
    }

    pub async fn fail_search(&self, status: Option<StatusCode>) {
        self.state.lock().await.fail_search = status;
    }

    /// Hold the next unanswered search for `delay` before responding.
    pub async fn delay_next_search(&self, delay: Duration) {
        self.state.lock().await.delays.push_back(delay);
    }

    pub async fn searches(&self) -> Vec<RecordedSearch> {
        self.state.lock().await.searches.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn cat_indices(State(state): State<Arc<Mutex<EngineState>>>) -> Response {
    let state = state.lock().await;
    if let Some(status) = state.fail_listing {
        return (status, "listing unavailable").into_response();
    }

    let mut out = String::from(
        "health status index                uuid                   pri rep docs.count\n",
    );
    let names = state
        .hidden
        .iter()
        .map(|n| (n.as_str(), 0))
        .chain(state.indices.iter().map(|(n, d)| (n.as_str(), d.len())));
    for (i, (name, count)) in names.enumerate() {
        out.push_str(&format!(
            "green  open   {name:<20} uuid{i:0>18}   1   0   {count}\n"
        ));
    }
    out.into_response()
}

async fn search(
    Path(index): Path<String>,
    State(state): State<Arc<Mutex<EngineState>>>,
    Json(body): Json<Value>,
) -> Response {
    let (delay, fail, docs) = {
        let mut state = state.lock().await;
        state.searches.push(RecordedSearch {
            index: index.clone(),
            body: body.clone(),
        });
        let docs: Vec<Value> = state
            .indices
            .iter()
            .filter(|(name, _)| index == "_all" || *name == index)
            .flat_map(|(_, docs)| docs.iter().cloned())
            .collect();
        let known = index == "_all" || state.indices.iter().any(|(n, _)| *n == index);
        let fail = state
            .fail_search
            .or((!known).then_some(StatusCode::NOT_FOUND));
        (state.delays.pop_front(), fail, docs)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = fail {
        let error = json!({ "error": { "type": "fake_failure" }, "status": status.as_u16() });
        return (status, Json(error)).into_response();
    }

    let size = body["size"].as_u64().unwrap_or(10) as usize;
    let total = docs.len();
    let hits: Vec<Value> = docs.into_iter().take(size).collect();
    Json(json!({
        "took": 1,
        "timed_out": false,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "max_score": 1.0,
            "hits": hits
        }
    }))
    .into_response()
}
