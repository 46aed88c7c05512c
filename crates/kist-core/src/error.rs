//! Failure kinds surfaced by the search client.
//!
//! Transport details are flattened to a message so the error can be cloned
//! across the UI channel and shown in the status line.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The index listing call failed or returned rows we could not read.
    #[error("index discovery failed: {0}")]
    Discovery(String),
    /// The search call failed or returned malformed JSON.
    #[error("search unavailable: {0}")]
    Search(String),
}

impl ClientError {
    pub fn discovery(err: impl std::fmt::Display) -> Self {
        ClientError::Discovery(err.to_string())
    }

    pub fn search(err: impl std::fmt::Display) -> Self {
        ClientError::Search(err.to_string())
    }
}
