//! Shared test utilities for kist integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fake_engine;
pub mod fixtures;

pub use builders::*;
pub use fake_engine::FakeEngine;
pub use fixtures::*;
