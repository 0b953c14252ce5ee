//! Common test utilities and helpers
//!
//! Shared across the integration test crates: an in-memory template source,
//! a tiny HTTP server for exercising the real fetcher, and definition fixtures.
#![allow(dead_code)]

pub mod http_server;
pub mod mock_services;
pub mod test_fixtures;
