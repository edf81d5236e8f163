//! services/api/src/web/home.rs
//!
//! The landing-page aggregate and the health check.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;

/// GET /api/home - Everything the landing page renders in one call
///
/// Unlike `/api/channels/promoted`, the promoted strip here is not filtered
/// by `active`: a promoted channel keeps its landing-page slot even while
/// hidden from the channel listing.
#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Active plans, approved reviews, promoted channels and headline stats")
    )
)]
pub async fn home_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.db.plans.load().await?;
    let reviews = state.db.reviews.load().await?;
    let channels = state.db.channels.load().await?;

    let active_plans: Vec<_> = plans.into_iter().filter(|p| p.active).collect();
    let approved_reviews: Vec<_> = reviews.into_iter().filter(|r| r.approved).collect();
    let promoted_channels: Vec<_> = channels.into_iter().filter(|c| c.promoted).collect();

    Ok(Json(json!({
        "plans": active_plans,
        "reviews": approved_reviews,
        "promotedChannels": promoted_channels,
        "stats": {
            "totalCreators": "50K+",
            "totalViews": "2.5B+",
            "revenueGenerated": "$125M+",
            "averageGrowth": "340%",
        },
    })))
}

/// GET /api/health - Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "CreatorHub Deal System API is running",
        "timestamp": Utc::now(),
    }))
}
