//! Query builder — translates a [`SearchState`] into an engine search request.
//!
//! The body is a `function_score` query:
//!
//! - one fuzzy `must` match per whitespace-separated term against the title field
//! - year range filters in bool-filter context when bounds are set
//! - two boost functions on the whole text: an operator-AND match weighted
//!   [`EXACT_WEIGHT`] and a fuzzy match weighted [`FUZZY_WEIGHT`], summed and
//!   multiplied into the base score
//! - sorted by score, ties broken by year in the user's order
//!
//! Bounds are not validated: `min_year > max_year` still produces a query,
//! which the engine answers with no hits.

use crate::types::{FieldNames, SearchState};
use serde_json::{json, Value};

pub const EXACT_WEIGHT: u32 = 100;
pub const FUZZY_WEIGHT: u32 = 1;

/// Path segment that targets every index.
pub const ALL_INDICES: &str = "_all";

/// A fully-built search, ready to POST.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target index; `None` searches all indices.
    pub index: Option<String>,
    /// Number of hits requested (the current page size).
    pub size: usize,
    pub body: Value,
}

impl SearchRequest {
    /// Request path relative to the engine base URL.
    pub fn path(&self) -> String {
        format!("/{}/_search", self.index.as_deref().unwrap_or(ALL_INDICES))
    }
}

/// Non-empty whitespace-separated terms of the free text.
pub fn terms(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn build(state: &SearchState, fields: &FieldNames) -> SearchRequest {
    SearchRequest {
        index: state.selected_index().map(str::to_string),
        size: state.page_size,
        body: build_body(state, fields),
    }
}

pub fn build_body(state: &SearchState, fields: &FieldNames) -> Value {
    let title = fields.title.as_str();
    let year = fields.year.as_str();

    let must: Vec<Value> = terms(&state.query)
        .map(|term| json!({ "match": { title: { "query": term, "fuzziness": "AUTO" } } }))
        .collect();

    let mut filter = Vec::new();
    if let Some(min) = state.min_year {
        filter.push(json!({ "range": { year: { "gte": min } } }));
    }
    if let Some(max) = state.max_year {
        filter.push(json!({ "range": { year: { "lte": max } } }));
    }

    json!({
        "query": {
            "function_score": {
                "query": { "bool": { "must": must, "filter": filter } },
                "functions": [
                    {
                        "filter": { "match": { title: { "query": state.query, "operator": "and" } } },
                        "weight": EXACT_WEIGHT
                    },
                    {
                        "filter": { "match": { title: { "query": state.query, "fuzziness": "AUTO" } } },
                        "weight": FUZZY_WEIGHT
                    }
                ],
                "boost_mode": "multiply",
                "score_mode": "sum"
            }
        },
        "size": state.page_size,
        "sort": [
            { "_score": "desc" },
            { year: { "order": state.order.as_str() } }
        ]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
