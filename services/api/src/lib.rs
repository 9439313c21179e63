//! services/api/src/lib.rs
//!
//! Library crate for the diary API service. The `api` binary wires the
//! adapters together; everything else lives here so the integration tests
//! can drive the router directly.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
