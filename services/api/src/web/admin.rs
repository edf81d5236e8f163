//! services/api/src/web/admin.rs
//!
//! The admin surface: dashboard aggregate, purchase ledger, and management
//! of deals, plans, reviews and users. Only the dashboard route sits behind
//! the token guard; the management routes are open, as the deployed admin
//! panel calls them without a session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::{rating_of, sanitize_user};
use creatorhub_core::domain::{
    next_id, Deal, DealPaymentStatus, DealStatus, Plan, Review, User,
};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealStatusRequest {
    #[serde(default)]
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number or numeric string. Must be present; zero is allowed.
    #[schema(value_type = Object)]
    pub price: Option<Value>,
    /// Either an array of feature lines or one newline-separated string.
    #[schema(value_type = Object)]
    pub features: Option<Value>,
    #[schema(value_type = Object)]
    pub popular: Option<Value>,
    pub plan_type: Option<String>,
    pub period: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub name: String,
    /// Accepts a number or a numeric string.
    #[schema(value_type = Object)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: String,
    pub subscribers: Option<String>,
    #[schema(value_type = Object)]
    pub verified: Option<Value>,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// A deal with its owner's contact details attached, the shape the admin
/// tables render. Unknown owners come through as `user: null`.
fn deal_with_user(deal: &Deal, users: &[User]) -> Value {
    let mut value = serde_json::to_value(deal).unwrap_or(Value::Null);
    let contact = users
        .iter()
        .find(|u| u.id == deal.user_id)
        .map(|u| {
            json!({
                "fullName": u.full_name,
                "email": u.email,
                "whatsappNumber": u.whatsapp_number,
            })
        })
        .unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("user".to_string(), contact);
    }
    value
}

/// The trimmed user row the admin dashboard lists.
fn user_summary(user: &User) -> Value {
    json!({
        "id": user.id,
        "fullName": user.full_name,
        "email": user.email,
        "whatsappNumber": user.whatsapp_number,
        "isAdmin": user.is_admin,
        "createdAt": user.created_at,
        "currentPlan": user.current_plan,
    })
}

fn float_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Feature lists arrive as arrays or as one newline-separated textarea blob.
fn features_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(text)) => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

/// GET /api/admin/dashboard - Totals plus recent activity, in one call
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users.load().await?;
    let mut deals = state.db.deals.load().await?;
    let plans = state.db.plans.load().await?;
    let reviews = state.db.reviews.load().await?;
    let channels = state.db.channels.load().await?;

    // Headline numbers
    let pending_deals = deals.iter().filter(|d| d.status == DealStatus::Pending).count();
    let completed_deals = deals
        .iter()
        .filter(|d| d.status == DealStatus::Completed)
        .count();
    let total_revenue: f64 = deals
        .iter()
        .filter(|d| d.status == DealStatus::Completed)
        .map(|d| d.plan_price)
        .sum();
    let pending_count = reviews.iter().filter(|r| !r.approved).count();
    let pending_reviews: Vec<Review> = reviews
        .iter()
        .filter(|r| !r.approved)
        .take(5)
        .cloned()
        .collect();

    // Most recent first; the full lists reuse the same ordering
    deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let mut sorted_users: Vec<&User> = users.iter().collect();
    sorted_users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let all_deals: Vec<Value> = deals.iter().map(|d| deal_with_user(d, &users)).collect();
    let all_users: Vec<Value> = sorted_users.iter().map(|u| user_summary(u)).collect();

    Ok(Json(json!({
        "stats": {
            "totalUsers": users.len(),
            "totalDeals": deals.len(),
            "pendingDeals": pending_deals,
            "completedDeals": completed_deals,
            "totalRevenue": total_revenue,
            "pendingReviews": pending_count,
            "totalPlans": plans.len(),
            "totalReviews": reviews.len(),
            "totalChannels": channels.len(),
        },
        "recentDeals": all_deals.iter().take(10).collect::<Vec<_>>(),
        "recentUsers": all_users.iter().take(10).collect::<Vec<_>>(),
        "pendingReviews": pending_reviews,
        "allDeals": all_deals,
        "allUsers": all_users,
        "allReviews": reviews,
        "allPlans": plans,
        "allChannels": channels,
    })))
}

//=========================================================================================
// Purchases
//=========================================================================================

/// GET /api/admin/purchases - Payments and deals flattened into one ledger
pub async fn purchases_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.db.payments.load().await?;
    let users = state.db.users.load().await?;
    let plans = state.db.plans.load().await?;
    let deals = state.db.deals.load().await?;

    let contact = |user_id: u64| -> (String, String) {
        users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| (u.full_name.clone(), u.email.clone()))
            .unwrap_or_else(|| ("Unknown User".to_string(), "Unknown".to_string()))
    };

    let mut rows: Vec<(DateTime<Utc>, Value)> = Vec::new();

    for payment in &payments {
        let (user_name, user_email) = contact(payment.user_id);
        let plan = payment
            .plan_id
            .as_id()
            .and_then(|id| plans.iter().find(|p| p.id == id));
        let plan_name = if payment.plan_name.is_empty() {
            plan.map(|p| p.name.clone())
                .unwrap_or_else(|| "Unknown Plan".to_string())
        } else {
            payment.plan_name.clone()
        };
        rows.push((
            payment.created_at,
            json!({
                "id": payment.id,
                "type": "payment",
                "userName": user_name,
                "userEmail": user_email,
                "planName": plan_name,
                "planType": payment.plan_type,
                "amount": payment.amount,
                "status": payment.status,
                "createdAt": payment.created_at,
            }),
        ));
    }

    for deal in &deals {
        let (user_name, user_email) = contact(deal.user_id);
        rows.push((
            deal.created_at,
            json!({
                "id": format!("deal_{}", deal.id),
                "type": "deal",
                "userName": user_name,
                "userEmail": user_email,
                "planName": deal.plan_name,
                "planType": "recurring",
                "amount": deal.plan_price,
                "status": deal.status,
                "createdAt": deal.created_at,
                "channelInfo": deal.channel_info,
            }),
        ));
    }

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    let ledger: Vec<Value> = rows.into_iter().map(|(_, row)| row).collect();

    Ok(Json(ledger))
}

//=========================================================================================
// Deals Management
//=========================================================================================

/// GET /api/admin/deals - Every deal with owner contact details
pub async fn list_deals_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut deals = state.db.deals.load().await?;
    let users = state.db.users.load().await?;

    deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let rows: Vec<Value> = deals.iter().map(|d| deal_with_user(d, &users)).collect();
    let total = rows.len();

    Ok(Json(json!({ "deals": rows, "total": total })))
}

/// PUT /api/admin/deals/{dealId}/status - Drive a deal through its lifecycle
///
/// Completing a deal also stamps `completedAt` and flips the payment
/// status to paid.
pub async fn update_deal_status_handler(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<u64>,
    Json(req): Json<UpdateDealStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = DealStatus::parse(&req.status)
        .ok_or_else(|| ApiError::Validation("Invalid status".to_string()))?;

    let mut deals = state.db.deals.load().await?;
    let deal = deals
        .iter_mut()
        .find(|d| d.id == deal_id)
        .ok_or_else(|| ApiError::NotFound("Deal not found".to_string()))?;

    deal.status = status;
    // An empty notes field keeps whatever was there before
    if let Some(notes) = req.admin_notes.filter(|n| !n.is_empty()) {
        deal.admin_notes = notes;
    }
    deal.updated_at = Utc::now();

    if status == DealStatus::Completed {
        deal.completed_at = Some(Utc::now());
        deal.payment_status = DealPaymentStatus::Paid;
    }

    let updated = deal.clone();
    state.db.deals.save(&deals).await?;

    Ok(Json(json!({
        "message": "Deal status updated successfully",
        "deal": updated,
    })))
}

/// DELETE /api/admin/deals/{dealId}
pub async fn delete_deal_handler(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut deals = state.db.deals.load().await?;
    let before = deals.len();
    deals.retain(|d| d.id != deal_id);
    if deals.len() == before {
        return Err(ApiError::NotFound("Deal not found".to_string()));
    }
    state.db.deals.save(&deals).await?;

    Ok(Json(json!({ "message": "Deal deleted successfully" })))
}

//=========================================================================================
// Plans Management
//=========================================================================================

/// GET /api/admin/plans - The whole catalogue, retired plans included
pub async fn list_plans_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.db.plans.load().await?;
    Ok(Json(json!({ "plans": plans })))
}

/// POST /api/admin/plans - Add a catalogue plan
pub async fn create_plan_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Price zero is a valid plan; only an absent price is rejected
    if req.name.is_empty() || req.description.is_empty() || req.price.is_none() {
        return Err(ApiError::Validation(
            "Name, description, and price are required".to_string(),
        ));
    }

    let mut plans = state.db.plans.load().await?;
    let plan = Plan {
        id: next_id(&plans, |p: &Plan| p.id),
        name: req.name,
        description: req.description,
        price: req.price.as_ref().map(float_of).unwrap_or(0.0),
        period: Some(req.period.unwrap_or_else(|| "/month".to_string())),
        plan_type: Some(req.plan_type.unwrap_or_else(|| "recurring".to_string())),
        features: features_of(req.features.as_ref()),
        popular: req.popular == Some(Value::Bool(true)),
        active: true,
        customizations: None,
        is_custom: false,
        created_at: Some(Utc::now()),
        updated_at: None,
    };
    plans.push(plan.clone());
    state.db.plans.save(&plans).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Plan created successfully",
            "plan": plan,
        })),
    ))
}

/// PUT /api/admin/plans/{planId} - Merge fields into a plan
///
/// Only the keys present in the body change; everything else survives.
/// A merge that produces an unreadable plan document is rejected whole.
pub async fn update_plan_handler(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<u64>,
    Json(patch): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let mut plans = state.db.plans.load().await?;
    let index = plans
        .iter()
        .position(|p| p.id == plan_id)
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    let mut merged = serde_json::to_value(&plans[index]).unwrap_or(Value::Null);
    if let (Value::Object(base), Value::Object(fields)) = (&mut merged, patch) {
        for (key, value) in fields {
            base.insert(key, value);
        }
    }
    merged["updatedAt"] = json!(Utc::now());

    let updated: Plan = serde_json::from_value(merged)
        .map_err(|_| ApiError::Validation("Invalid plan data".to_string()))?;
    plans[index] = updated.clone();
    state.db.plans.save(&plans).await?;

    Ok(Json(json!({
        "message": "Plan updated successfully",
        "plan": updated,
    })))
}

/// DELETE /api/admin/plans/{planId}
pub async fn delete_plan_handler(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut plans = state.db.plans.load().await?;
    let before = plans.len();
    plans.retain(|p| p.id != plan_id);
    if plans.len() == before {
        return Err(ApiError::NotFound("Plan not found".to_string()));
    }
    state.db.plans.save(&plans).await?;

    Ok(Json(json!({ "message": "Plan deleted successfully" })))
}

//=========================================================================================
// Reviews Management
//=========================================================================================

/// GET /api/admin/reviews - Every review, newest first
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut reviews = state.db.reviews.load().await?;
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(json!({ "reviews": reviews })))
}

/// POST /api/admin/reviews - Seed a testimonial
///
/// Seeded reviews go live immediately and are flagged `isFake` so they can
/// be told apart from organic ones later.
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rating_value = req.rating.unwrap_or(Value::Null);
    if req.name.is_empty() || rating_value.is_null() || req.comment.is_empty() {
        return Err(ApiError::Validation(
            "Name, rating, and comment are required".to_string(),
        ));
    }

    let rating = rating_of(&rating_value)
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| ApiError::Validation("Rating must be between 1 and 5".to_string()))?;

    let mut reviews = state.db.reviews.load().await?;
    let review = Review {
        id: next_id(&reviews, |r: &Review| r.id),
        user_id: None,
        name: req.name,
        email: None,
        rating: rating as u8,
        comment: req.comment,
        subscribers: req
            .subscribers
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "10K".to_string()),
        verified: req.verified == Some(Value::Bool(true)),
        approved: true,
        is_fake: true,
        likes: rand::thread_rng().gen_range(5..25),
        created_at: Utc::now(),
    };
    reviews.push(review.clone());
    state.db.reviews.save(&reviews).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review created successfully",
            "review": review,
        })),
    ))
}

/// PUT /api/admin/reviews/{reviewId}/approve - Put a review on the wall
pub async fn approve_review_handler(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut reviews = state.db.reviews.load().await?;
    let review = reviews
        .iter_mut()
        .find(|r| r.id == review_id)
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    review.approved = true;
    let approved = review.clone();
    state.db.reviews.save(&reviews).await?;

    Ok(Json(json!({
        "message": "Review approved successfully",
        "review": approved,
    })))
}

/// DELETE /api/admin/reviews/{reviewId}
pub async fn delete_review_handler(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut reviews = state.db.reviews.load().await?;
    let before = reviews.len();
    reviews.retain(|r| r.id != review_id);
    if reviews.len() == before {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }
    state.db.reviews.save(&reviews).await?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

//=========================================================================================
// Users Management
//=========================================================================================

/// GET /api/admin/users - Full user documents, passwords stripped
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut users = state.db.users.load().await?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let rows: Vec<Value> = users.iter().map(sanitize_user).collect();
    Ok(Json(json!({ "users": rows })))
}

/// PUT /api/admin/users/{userId} - Merge fields into a user
///
/// The password cannot be changed through this route; a `password` key in
/// the body is discarded before merging.
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    Json(patch): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let mut users = state.db.users.load().await?;
    let index = users
        .iter()
        .position(|u| u.id == user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut merged = serde_json::to_value(&users[index]).unwrap_or(Value::Null);
    if let (Value::Object(base), Value::Object(mut fields)) = (&mut merged, patch) {
        fields.remove("password");
        for (key, value) in fields {
            base.insert(key, value);
        }
    }
    merged["updatedAt"] = json!(Utc::now());

    let updated: User = serde_json::from_value(merged)
        .map_err(|_| ApiError::Validation("Invalid user data".to_string()))?;
    users[index] = updated;
    let response = sanitize_user(&users[index]);
    state.db.users.save(&users).await?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": response,
    })))
}

/// DELETE /api/admin/users/{userId} - Remove an account
///
/// Admin accounts cannot be deleted.
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut users = state.db.users.load().await?;
    let user = users
        .iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.is_admin {
        return Err(ApiError::Validation("Cannot delete admin users".to_string()));
    }

    users.retain(|u| u.id != user_id);
    state.db.users.save(&users).await?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
