//! services/api/src/web/reviews.rs
//!
//! Public review wall plus authenticated submission. Reviews only appear
//! on the wall once an admin approves them.

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
use crate::web::{is_blank, rating_of};
use creatorhub_core::domain::{next_id, Review};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// Accepts a number or a numeric string.
    #[schema(value_type = Object)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /api/reviews - The public review wall
#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "Approved reviews only")
    )
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.db.reviews.load().await?;
    let approved: Vec<Review> = reviews.into_iter().filter(|r| r.approved).collect();
    Ok(Json(approved))
}

/// POST /api/reviews - Submit a review (one per account)
pub async fn submit_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate rating and comment
    if is_blank(&req.rating) || req.comment.is_empty() {
        return Err(ApiError::Validation(
            "Rating and comment are required".to_string(),
        ));
    }

    let rating = rating_of(req.rating.as_ref().unwrap_or(&Value::Null))
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| ApiError::Validation("Rating must be between 1 and 5".to_string()))?;

    // 2. The review carries the account's name and email
    let users = state.db.users.load().await?;
    let user = users
        .iter()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // 3. One review per account
    let mut reviews = state.db.reviews.load().await?;
    if reviews.iter().any(|r| r.user_id == Some(user.id)) {
        return Err(ApiError::Validation(
            "You have already submitted a review".to_string(),
        ));
    }

    // 4. Store it unapproved until an admin signs off
    let review = Review {
        id: next_id(&reviews, |r: &Review| r.id),
        user_id: Some(user.id),
        name: user.full_name.clone(),
        email: Some(user.email.clone()),
        rating: rating as u8,
        comment: req.comment.trim().to_string(),
        subscribers: "New Creator".to_string(),
        verified: false,
        approved: false,
        is_fake: false,
        likes: 0,
        created_at: Utc::now(),
    };
    reviews.push(review.clone());
    state.db.reviews.save(&reviews).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review submitted successfully. It will be visible after admin approval.",
            "review": review,
        })),
    ))
}

/// POST /api/reviews/{id}/like - Bump a review's like counter
#[utoipa::path(
    post,
    path = "/api/reviews/{id}/like",
    params(("id" = u64, Path, description = "Review id")),
    responses(
        (status = 200, description = "New like count"),
        (status = 404, description = "No review with this id")
    )
)]
pub async fn like_review_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut reviews = state.db.reviews.load().await?;
    let review = reviews
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    review.likes += 1;
    let likes = review.likes;
    state.db.reviews.save(&reviews).await?;

    Ok(Json(json!({
        "message": "Review liked",
        "likes": likes,
    })))
}
