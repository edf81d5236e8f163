//! services/api/src/web/plans.rs
//!
//! Public catalogue endpoints: active plan listing, single plan lookup and
//! quoting of customized plans.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use creatorhub_core::domain::{Plan, PlanCustomization};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomPlanRequest {
    #[serde(default)]
    pub name: String,
    pub features: Option<Vec<String>>,
    pub base_price: Option<f64>,
    #[schema(value_type = Vec<Object>)]
    pub customizations: Option<Vec<PlanCustomization>>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /api/plans - All currently purchasable plans
#[utoipa::path(
    get,
    path = "/api/plans",
    responses(
        (status = 200, description = "Active plans only; retired ones are filtered out")
    )
)]
pub async fn list_plans_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.db.plans.load().await?;
    let active: Vec<Plan> = plans.into_iter().filter(|p| p.active).collect();
    Ok(Json(active))
}

/// GET /api/plans/{id} - One plan, active or not
#[utoipa::path(
    get,
    path = "/api/plans/{id}",
    params(("id" = u64, Path, description = "Plan id")),
    responses(
        (status = 200, description = "The plan"),
        (status = 404, description = "No plan with this id")
    )
)]
pub async fn get_plan_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.db.plans.load().await?;
    let plan = plans
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;
    Ok(Json(plan))
}

/// POST /api/plans/custom - Price a customized plan
///
/// The quote is returned to the caller but never written to the catalogue;
/// a custom plan only becomes durable once a payment references it.
#[utoipa::path(
    post,
    path = "/api/plans/custom",
    request_body = CustomPlanRequest,
    responses(
        (status = 200, description = "The priced custom plan"),
        (status = 400, description = "Name, features or base price missing")
    )
)]
pub async fn custom_plan_handler(
    Json(req): Json<CustomPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // A zero base price reads as missing. An empty feature list is allowed,
    // an absent one is not.
    let base_price = req.base_price.unwrap_or(0.0);
    if req.name.is_empty() || req.features.is_none() || base_price == 0.0 {
        return Err(ApiError::Validation(
            "Name, features, and base price are required".to_string(),
        ));
    }

    let customizations = req.customizations.unwrap_or_default();
    let price = base_price
        + customizations
            .iter()
            .map(|c| c.additional_price)
            .sum::<f64>();

    let plan = Plan {
        // Millisecond timestamp, so custom ids never collide with the catalogue.
        id: Utc::now().timestamp_millis() as u64,
        name: format!("Custom {}", req.name),
        price,
        period: Some("/month".to_string()),
        description: "Customized plan based on your needs".to_string(),
        features: req.features.unwrap_or_default(),
        customizations: Some(customizations),
        popular: false,
        active: true,
        plan_type: None,
        is_custom: true,
        created_at: Some(Utc::now()),
        updated_at: None,
    };

    Ok(Json(json!({
        "message": "Custom plan created",
        "plan": plan,
    })))
}
