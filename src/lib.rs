// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod translate;

pub use crate::api::{router, AppState};
pub use crate::ingest::types::{Item, Source};
