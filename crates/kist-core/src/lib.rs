//! kist-core — core library for the kist search client.
//!
//! Everything here is pure: no sockets, no terminal. The engine crate runs
//! the requests this crate builds, and the TUI renders the state it holds.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────── Session ────────────┐
//! catalog ──►│ SearchState ─► query ─► Ticket  │──► engine
//!            │ ResultSet ◄─ response ◄─────────│◄── engine
//!            │ ExpansionState (present)        │
//!            └─────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod pager;
pub mod present;
pub mod query;
pub mod response;
pub mod session;
pub mod types;

pub use error::ClientError;
pub use session::{Session, Ticket};
pub use types::{Document, FieldNames, IndexCatalog, IndexEntry, ResultSet, SearchState, SortOrder};
