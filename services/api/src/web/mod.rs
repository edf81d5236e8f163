//! services/api/src/web/mod.rs
//!
//! The HTTP surface: route table, handlers and the helpers they share.

pub mod admin;
pub mod auth;
pub mod backup;
pub mod channels;
pub mod dashboard;
pub mod deals;
pub mod docs;
pub mod home;
pub mod middleware;
pub mod missions;
pub mod payments;
pub mod plans;
pub mod reviews;
pub mod state;

use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::Value;

use creatorhub_core::domain::User;

pub use docs::ApiDoc;
pub use middleware::{attach_identity, require_auth};
pub use state::{AppState, Database};

//=========================================================================================
// Router Assembly
//=========================================================================================

/// Builds the full API router.
///
/// Routes come in three groups: public ones, ones that attach an identity
/// but never reject (so guests get a degraded answer instead of an error),
/// and ones behind the token guard. Of the admin surface only
/// `/api/admin/dashboard` checks a token; the rest is open.
pub fn api_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(home::health_handler))
        .route("/api/home", get(home::home_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/forgot-password", post(auth::forgot_password_handler))
        .route("/api/auth/reset-password", post(auth::reset_password_handler))
        .route("/api/plans", get(plans::list_plans_handler))
        .route("/api/plans/custom", post(plans::custom_plan_handler))
        .route("/api/plans/{id}", get(plans::get_plan_handler))
        .route("/api/reviews", get(reviews::list_reviews_handler))
        .route("/api/reviews/{id}/like", post(reviews::like_review_handler))
        .route("/api/channels", get(channels::list_channels_handler))
        .route("/api/channels/promoted", get(channels::promoted_channels_handler))
        .route("/api/backup/github", get(backup::github_backup_handler))
        .route("/api/admin/purchases", get(admin::purchases_handler))
        .route("/api/admin/deals", get(admin::list_deals_handler))
        .route("/api/admin/deals/{dealId}/status", put(admin::update_deal_status_handler))
        .route("/api/admin/deals/{dealId}", delete(admin::delete_deal_handler))
        .route(
            "/api/admin/plans",
            get(admin::list_plans_handler).post(admin::create_plan_handler),
        )
        .route(
            "/api/admin/plans/{planId}",
            put(admin::update_plan_handler).delete(admin::delete_plan_handler),
        )
        .route(
            "/api/admin/reviews",
            get(admin::list_reviews_handler).post(admin::create_review_handler),
        )
        .route("/api/admin/reviews/{reviewId}/approve", put(admin::approve_review_handler))
        .route("/api/admin/reviews/{reviewId}", delete(admin::delete_review_handler))
        .route("/api/admin/users", get(admin::list_users_handler))
        .route(
            "/api/admin/users/{userId}",
            put(admin::update_user_handler).delete(admin::delete_user_handler),
        );

    let identity_routes = Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::attach_identity,
        ));

    let protected_routes = Router::new()
        .route("/api/reviews", post(reviews::submit_review_handler))
        .route("/api/deals/create", post(deals::create_deal_handler))
        .route("/api/deals/my-deals", get(deals::my_deals_handler))
        .route("/api/deals/{dealId}", get(deals::get_deal_handler))
        .route("/api/user/{userId}/deals", get(deals::user_deals_handler))
        .route("/api/dashboard", get(dashboard::dashboard_handler))
        .route("/api/dashboard/youtube", put(dashboard::update_youtube_handler))
        .route("/api/payments/create-payment", post(payments::create_payment_handler))
        .route("/api/payments/confirm-payment", post(payments::confirm_payment_handler))
        .route("/api/payments/history", get(payments::payment_history_handler))
        .route("/api/missions", get(missions::list_missions_handler))
        .route("/api/missions/{missionId}/complete", post(missions::complete_mission_handler))
        .route("/api/admin/dashboard", get(admin::dashboard_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(identity_routes)
        .merge(protected_routes)
        .with_state(state)
}

//=========================================================================================
// Shared Handler Helpers
//=========================================================================================

/// Serializes a user with the password hash removed. Every route that
/// returns a user document goes through this.
pub(crate) fn sanitize_user(user: &User) -> Value {
    let mut value = serde_json::to_value(user).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.remove("password");
    }
    value
}

/// Required-field check for loosely typed JSON bodies: a missing key, null,
/// an empty string, zero and `false` all count as blank.
pub(crate) fn is_blank(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        _ => false,
    }
}

/// Reads a rating that may arrive as a number or a numeric string.
/// Fractions are truncated. Anything unreadable is `None`.
pub(crate) fn rating_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

/// Reads a catalogue plan id that may arrive as a number or a string.
pub(crate) fn plan_id_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_covers_missing_null_empty_and_zero() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some(Value::Null)));
        assert!(is_blank(&Some(json!(""))));
        assert!(is_blank(&Some(json!(0))));
        assert!(!is_blank(&Some(json!("0"))));
        assert!(!is_blank(&Some(json!(42))));
        assert!(!is_blank(&Some(json!(["a"]))));
    }

    #[test]
    fn ratings_parse_from_numbers_and_strings() {
        assert_eq!(rating_of(&json!(5)), Some(5));
        assert_eq!(rating_of(&json!(4.7)), Some(4));
        assert_eq!(rating_of(&json!("3")), Some(3));
        assert_eq!(rating_of(&json!("not a number")), None);
        assert_eq!(rating_of(&json!(null)), None);
    }

    #[test]
    fn plan_ids_parse_from_numbers_and_strings() {
        assert_eq!(plan_id_of(&json!(2)), Some(2));
        assert_eq!(plan_id_of(&json!("2")), Some(2));
        assert_eq!(plan_id_of(&json!("custom")), None);
    }
}
