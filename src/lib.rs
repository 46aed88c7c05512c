//! kist — terminal search client for Elasticsearch library catalogues.
//!
//! The binary is a thin shell over three crates, re-exported here so
//! integration tests can reach everything through one path:
//!
//! ```text
//! kist-core ──► kist-engine ──► kist-tui
//!  (state)       (HTTP)          (terminal)
//!                  │
//!                  └──► headless (stdout)
//! ```

pub mod headless;

pub use kist_core;
pub use kist_engine;
pub use kist_tui;
