//! services/api/src/web/deals.rs
//!
//! Deal lifecycle endpoints for signed-in creators. A deal freezes the
//! plan's name, price and description at purchase time, so later catalogue
//! edits never change what an existing customer bought.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::identity::Claims;
use crate::web::state::AppState;
use crate::web::{is_blank, plan_id_of};
use creatorhub_core::domain::{
    next_id, subscriber_count, ChannelInfo, Deal, DealPaymentStatus, DealStatus,
};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    /// Catalogue plan id, as a number or numeric string.
    #[schema(value_type = Object)]
    pub plan_id: Option<Value>,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub channel_url: String,
    /// Subscriber count, as a number or a formatted string.
    #[schema(value_type = Object)]
    pub current_subscribers: Option<Value>,
    #[serde(default)]
    pub utr_number: String,
    pub description: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/deals/create - Open a deal against a catalogue plan
pub async fn create_deal_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateDealRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Everything except the description is required
    if is_blank(&req.plan_id)
        || req.channel_name.is_empty()
        || req.channel_url.is_empty()
        || is_blank(&req.current_subscribers)
        || req.utr_number.is_empty()
    {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    // 2. Resolve the plan being bought
    let plan_id = req
        .plan_id
        .as_ref()
        .and_then(plan_id_of)
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    let plans = state.db.plans.load().await?;
    let plan = plans
        .iter()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    let users = state.db.users.load().await?;
    if !users.iter().any(|u| u.id == claims.id) {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    // 3. Snapshot the plan into the deal
    let now = Utc::now();
    let mut deals = state.db.deals.load().await?;
    let deal = Deal {
        id: next_id(&deals, |d: &Deal| d.id),
        user_id: claims.id,
        plan_id: plan.id,
        plan_name: plan.name.clone(),
        plan_price: plan.price,
        plan_description: plan.description.clone(),
        channel_info: ChannelInfo {
            channel_name: req.channel_name,
            channel_url: req.channel_url,
            current_subscribers: req
                .current_subscribers
                .as_ref()
                .map(subscriber_count)
                .unwrap_or(0),
            utr_number: req.utr_number,
            description: req.description.unwrap_or_default(),
        },
        status: DealStatus::Pending,
        payment_status: DealPaymentStatus::Pending,
        admin_notes: String::new(),
        created_at: now,
        updated_at: now,
        completed_at: None,
    };
    deals.push(deal.clone());
    state.db.deals.save(&deals).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Deal created successfully",
            "deal": deal,
        })),
    ))
}

/// GET /api/deals/my-deals - The caller's deals, most recent first
pub async fn my_deals_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let deals = state.db.deals.load().await?;
    let mut mine: Vec<Deal> = deals.into_iter().filter(|d| d.user_id == claims.id).collect();
    mine.reverse();
    Ok(Json(json!({ "deals": mine })))
}

/// GET /api/deals/{dealId} - One of the caller's deals
///
/// Someone else's deal id answers 404 rather than 403, so ids cannot be
/// probed for existence.
pub async fn get_deal_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(deal_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let deals = state.db.deals.load().await?;
    let deal = deals
        .into_iter()
        .find(|d| d.id == deal_id && d.user_id == claims.id)
        .ok_or_else(|| ApiError::NotFound("Deal not found".to_string()))?;
    Ok(Json(json!({ "deal": deal })))
}

/// GET /api/user/{userId}/deals - A user's deals, admin or self only
pub async fn user_deals_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    if !claims.is_admin && claims.id != user_id {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let deals = state.db.deals.load().await?;
    let user_deals: Vec<Deal> = deals.into_iter().filter(|d| d.user_id == user_id).collect();
    Ok(Json(user_deals))
}
