//! services/api/src/web/dashboard.rs
//!
//! The signed-in creator's dashboard aggregate and their YouTube profile.

use axum::{extract::State, response::IntoResponse, Extension, Json};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::identity::Claims;
use crate::web::sanitize_user;
use crate::web::state::AppState;
use creatorhub_core::domain::{Deal, DealStatus, YoutubeInfo};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateYoutubeRequest {
    pub channel_name: Option<String>,
    pub channel_url: Option<String>,
    /// Number or formatted string, stored as submitted.
    #[schema(value_type = Object)]
    pub current_subscribers: Option<Value>,
    #[schema(value_type = Object)]
    pub target_subscribers: Option<Value>,
    pub description: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /api/dashboard - Everything the creator dashboard renders
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users.load().await?;
    let deals = state.db.deals.load().await?;
    let plans = state.db.plans.load().await?;

    let user = users
        .iter()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Split the caller's deals by lifecycle state
    let mut user_deals: Vec<Deal> = deals.into_iter().filter(|d| d.user_id == claims.id).collect();
    let active_deals: Vec<Deal> = user_deals
        .iter()
        .filter(|d| d.status.is_open())
        .cloned()
        .collect();
    let completed_deals: Vec<Deal> = user_deals
        .iter()
        .filter(|d| d.status == DealStatus::Completed)
        .cloned()
        .collect();

    let total_spent: f64 = completed_deals.iter().map(|d| d.plan_price).sum();

    // Placeholder analytics, present only while a deal is running. There is
    // no channel telemetry yet, so the numbers are sampled fresh per request.
    let analytics = if active_deals.is_empty() {
        Value::Null
    } else {
        let mut rng = rand::thread_rng();
        json!({
            "channelViews": rng.gen_range(50_000..150_000),
            "subscribers": rng.gen_range(10_000..60_000),
            "videosUploaded": rng.gen_range(20..120),
            "revenue": rng.gen_range(1_000..6_000),
        })
    };

    let total_deals = user_deals.len();
    let active_count = active_deals.len();
    let completed_count = completed_deals.len();
    user_deals.reverse();

    Ok(Json(json!({
        "user": sanitize_user(user),
        "deals": user_deals,
        "activeDeals": active_deals,
        "completedDeals": completed_deals,
        "availablePlans": plans.into_iter().filter(|p| p.active).collect::<Vec<_>>(),
        "analytics": analytics,
        "stats": {
            "totalSpent": total_spent,
            "activeDeals": active_count,
            "completedDeals": completed_count,
            "totalDeals": total_deals,
        },
    })))
}

/// PUT /api/dashboard/youtube - Replace the caller's YouTube profile
///
/// The stored profile is replaced wholesale with whatever fields arrive;
/// omitted fields are dropped rather than merged.
pub async fn update_youtube_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateYoutubeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut users = state.db.users.load().await?;
    let user = users
        .iter_mut()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let info = YoutubeInfo {
        channel_name: req.channel_name,
        channel_url: req.channel_url,
        current_subscribers: req.current_subscribers.unwrap_or(Value::Null),
        target_subscribers: req.target_subscribers.unwrap_or(Value::Null),
        description: req.description,
        updated_at: Some(Utc::now()),
    };
    user.youtube_info = Some(info.clone());
    user.updated_at = Some(Utc::now());

    state.db.users.save(&users).await?;

    Ok(Json(json!({
        "message": "YouTube information updated successfully",
        "youtubeInfo": info,
    })))
}
