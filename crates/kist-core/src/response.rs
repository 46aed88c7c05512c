//! Search response decoding.
//!
//! Only `hits.total.value` and `hits.hits[]._id` / `._source` are read; the
//! rest of the engine's envelope is ignored.

use crate::error::ClientError;
use crate::types::{Document, ResultSet};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct Envelope {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: Total,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Total {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

/// Decode a search response body, keeping at most `limit` hits.
pub fn parse(body: &[u8], limit: usize) -> Result<ResultSet, ClientError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| ClientError::Search(format!("malformed search response: {e}")))?;

    let hits: Vec<Document> = envelope
        .hits
        .hits
        .into_iter()
        .take(limit)
        .map(|hit| Document {
            id: hit.id,
            fields: hit
                .source
                .iter()
                .map(|(k, v)| (k.clone(), value_text(v)))
                .collect(),
            source: hit.source,
        })
        .collect();

    Ok(ResultSet {
        total: envelope.hits.total.value,
        hits,
        fetched_at: chrono::Utc::now(),
    })
}

/// Render a `_source` value as display text. Strings are taken verbatim,
/// null is empty, everything else uses its JSON form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
