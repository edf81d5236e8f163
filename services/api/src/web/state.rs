//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the bundle of per-collection
//! store handles.

use crate::config::Config;
use creatorhub_core::domain::{Channel, Deal, Payment, Plan, Review, User};
use creatorhub_core::ports::Store;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

//=========================================================================================
// Database (One Store Handle per Collection)
//=========================================================================================

/// Store handles for every collection, all behind the storage port so the
/// web layer never touches files directly.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn Store<User>>,
    pub plans: Arc<dyn Store<Plan>>,
    pub reviews: Arc<dyn Store<Review>>,
    pub channels: Arc<dyn Store<Channel>>,
    pub deals: Arc<dyn Store<Deal>>,
    pub payments: Arc<dyn Store<Payment>>,
}
