//! services/api/src/web/payments.rs
//!
//! Simulated payment flow. Creating a payment records an intent; confirming
//! it marks the record completed and provisions the purchase onto the user:
//! a growth mission for one-time plans, a subscription window for recurring
//! ones. No real payment provider is involved.

use axum::{extract::State, response::IntoResponse, Extension, Json};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::identity::Claims;
use crate::web::plan_id_of;
use crate::web::state::AppState;
use creatorhub_core::domain::{
    CurrentPlan, Mission, Payment, PaymentStatus, PlanRef, YoutubeInfo,
};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Catalogue plan id, ignored when `customPlan` is present.
    #[schema(value_type = Object)]
    pub plan_id: Option<Value>,
    pub custom_plan: Option<CustomPlanPayload>,
    #[schema(value_type = Object)]
    pub youtube_info: Option<YoutubeInfo>,
}

/// The parts of a client-built custom plan the payment flow cares about.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomPlanPayload {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub plan_type: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[serde(default)]
    pub payment_id: String,
    pub payment_method_id: Option<String>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Random lowercase base36 suffix for payment and mission ids.
fn random_suffix(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Renders a loosely-typed subscriber value as a label. Null, empty strings
/// and zero all read as absent.
fn value_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds the growth mission a confirmed one-time payment provisions.
fn mission_for(payment: &Payment) -> Mission {
    let youtube = payment.youtube_info.as_ref();
    let target = youtube.and_then(|y| value_label(&y.target_subscribers));
    let channel = youtube
        .and_then(|y| y.channel_name.clone())
        .filter(|name| !name.is_empty());
    let initial = youtube.and_then(|y| value_label(&y.current_subscribers));

    Mission {
        id: format!("mission_{}_{}", Utc::now().timestamp_millis(), random_suffix(9)),
        title: format!(
            "Reach {} Subscribers",
            target.as_deref().unwrap_or("Target")
        ),
        description: format!(
            "Grow your channel \"{}\" to {} subscribers",
            channel.as_deref().unwrap_or("Your Channel"),
            target.as_deref().unwrap_or("target")
        ),
        kind: "subscribers".to_string(),
        target_value: target.unwrap_or_else(|| "100000".to_string()),
        initial_value: initial.unwrap_or_else(|| "0".to_string()),
        plan_id: payment.plan_id.clone(),
        plan_name: payment.plan_name.clone(),
        completed: false,
        progress: 0,
        created_at: Utc::now(),
        completed_at: None,
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/payments/create-payment - Record a payment intent
pub async fn create_payment_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Resolve what is being bought. A custom plan is taken as sent;
    //    otherwise the id must resolve against the catalogue.
    let (plan_ref, plan_name, plan_type, amount) = match req.custom_plan {
        Some(custom) => (
            PlanRef::Tag("custom".to_string()),
            custom.name.unwrap_or_default(),
            custom.plan_type.unwrap_or_else(|| "recurring".to_string()),
            custom.price.unwrap_or(0.0),
        ),
        None => {
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
            (
                PlanRef::Id(plan.id),
                plan.name.clone(),
                plan.billing_type().to_string(),
                plan.price,
            )
        }
    };

    let users = state.db.users.load().await?;
    let user = users
        .iter()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // 2. Persist the pending payment
    let mut payments = state.db.payments.load().await?;
    let now = Utc::now();
    let payment_id = format!("pay_{}_{}", now.timestamp_millis(), random_suffix(9));

    let payment = Payment {
        id: payment_id.clone(),
        user_id: user.id,
        plan_id: plan_ref,
        plan_name,
        plan_type,
        amount,
        currency: "USD".to_string(),
        status: PaymentStatus::Pending,
        payment_method: None,
        youtube_info: req.youtube_info,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };
    payments.push(payment);
    state.db.payments.save(&payments).await?;

    // 3. Hand the client a demo client secret in place of a provider's
    Ok(Json(json!({
        "message": "Payment created successfully",
        "paymentId": payment_id,
        "amount": amount,
        "currency": "USD",
        "clientSecret": format!("pi_{payment_id}_secret_demo"),
    })))
}

/// POST /api/payments/confirm-payment - Simulate a successful charge
pub async fn confirm_payment_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.payment_id.is_empty() {
        return Err(ApiError::Validation("Payment ID is required".to_string()));
    }

    // 1. The payment must exist and belong to the caller
    let mut payments = state.db.payments.load().await?;
    let payment = payments
        .iter_mut()
        .find(|p| p.id == req.payment_id)
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    if payment.user_id != claims.id {
        return Err(ApiError::Forbidden("Unauthorized".to_string()));
    }

    // 2. Mark it completed
    let now = Utc::now();
    payment.status = PaymentStatus::Completed;
    payment.payment_method = Some(
        req.payment_method_id
            .unwrap_or_else(|| "demo_card".to_string()),
    );
    payment.completed_at = Some(now);
    payment.updated_at = now;

    let confirmed = payment.clone();
    state.db.payments.save(&payments).await?;

    // 3. Provision the purchase onto the user
    let mut users = state.db.users.load().await?;
    let mut current_plan = None;
    if let Some(user) = users.iter_mut().find(|u| u.id == claims.id) {
        if confirmed.plan_type == "one-time" {
            user.missions.push(mission_for(&confirmed));
        } else {
            user.current_plan = Some(CurrentPlan {
                plan_id: confirmed.plan_id.clone(),
                plan_name: confirmed.plan_name.clone(),
                plan_type: confirmed.plan_type.clone(),
                amount: confirmed.amount,
                start_date: now,
                end_date: now + Duration::days(30),
                status: "active".to_string(),
            });
        }
        user.updated_at = Some(now);
        current_plan = user.current_plan.clone();
        state.db.users.save(&users).await?;
    }

    let mut body = json!({
        "message": "Payment confirmed successfully",
        "payment": confirmed,
    });
    if let Some(plan) = current_plan {
        body["plan"] = serde_json::to_value(plan).unwrap_or(Value::Null);
    }

    Ok(Json(body))
}

/// GET /api/payments/history - The caller's payments
pub async fn payment_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.db.payments.load().await?;
    let mine: Vec<Payment> = payments
        .into_iter()
        .filter(|p| p.user_id == claims.id)
        .collect();
    Ok(Json(mine))
}
