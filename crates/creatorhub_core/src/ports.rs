//! crates/creatorhub_core/src/ports.rs
//!
//! Defines the storage contract for the application's core logic.
//! The trait forms the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete persistence backend (JSON files today, a
//! real database later) without touching service logic.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

//=========================================================================================
// Generic Store Error and Result Types
//=========================================================================================

/// A generic error type for all storage operations.
/// This abstracts away the specific errors from the backing medium.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("Serialization failure: {0}")]
    Serde(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Storage Port (Trait)
//=========================================================================================

/// Whole-collection storage. Every mutation in the system is a
/// load-modify-save sequence over one of these; there is no partial update.
/// Under concurrent writers the last save wins.
#[async_trait]
pub trait Store<T>: Send + Sync
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Loads the entire collection. Implementations treat an unreadable or
    /// missing backing resource as an empty collection rather than an error.
    async fn load(&self) -> StoreResult<Vec<T>>;

    /// Replaces the entire collection.
    async fn save(&self, items: &[T]) -> StoreResult<()>;
}
