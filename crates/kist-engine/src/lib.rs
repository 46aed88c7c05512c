//! kist-engine — talks to the search engine.
//!
//! [`HttpBackend`] speaks the engine's REST API over hyper; [`discover`] and
//! [`execute`] turn raw responses into core types; [`SearchClient`] drives a
//! [`kist_core::Session`] against any [`Backend`].

pub mod backend;
pub mod client;
pub mod error;

pub use backend::{Backend, HttpBackend};
pub use client::{discover, execute, SearchClient};
pub use error::EngineError;
