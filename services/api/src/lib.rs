//! services/api/src/lib.rs
//!
//! The library crate behind the `api` binary. The web layer, the JSON file
//! storage adapter and the GitHub backup adapter all live here so the
//! integration tests can drive the router without starting a server.

pub mod adapters;
pub mod config;
pub mod error;
pub mod identity;
pub mod web;
