//! Transport errors from talking to the engine over HTTP.

use std::time::Duration;

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },

    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("connection to engine failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("engine responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
