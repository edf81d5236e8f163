//! services/api/src/web/channels.rs
//!
//! Showcase channel listings for the landing page.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;
use creatorhub_core::domain::Channel;

/// GET /api/channels - All active showcase channels
#[utoipa::path(
    get,
    path = "/api/channels",
    responses(
        (status = 200, description = "Active channels")
    )
)]
pub async fn list_channels_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let channels = state.db.channels.load().await?;
    let active: Vec<Channel> = channels.into_iter().filter(|c| c.active).collect();
    Ok(Json(active))
}

/// GET /api/channels/promoted - Channels bought into the promoted slot
#[utoipa::path(
    get,
    path = "/api/channels/promoted",
    responses(
        (status = 200, description = "Channels that are both promoted and active")
    )
)]
pub async fn promoted_channels_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let channels = state.db.channels.load().await?;
    let promoted: Vec<Channel> = channels
        .into_iter()
        .filter(|c| c.promoted && c.active)
        .collect();
    Ok(Json(promoted))
}
