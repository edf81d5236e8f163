//! services/api/src/web/middleware.rs
//!
//! Access-guard middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity::{decode_token, Identity};
use crate::web::state::AppState;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}

/// Middleware that validates the bearer token and extracts the caller's claims.
///
/// If valid, inserts the claims into request extensions for handlers to use.
/// A missing token returns 401; a present but unverifiable one returns 403.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the bearer token
    let token = bearer_token(req.headers()).ok_or(ApiError::MissingToken)?;

    // 2. Verify signature and expiry
    let claims = decode_token(token, &state.config.jwt_secret).ok_or(ApiError::InvalidToken)?;

    // 3. Insert claims into request extensions
    req.extensions_mut().insert(claims);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Middleware for routes that serve both signed-in users and visitors.
///
/// Never rejects the request. A verifiable token yields
/// `Identity::Authenticated`; anything else yields `Identity::Guest`.
pub async fn attach_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = bearer_token(req.headers())
        .and_then(|token| decode_token(token, &state.config.jwt_secret))
        .map(Identity::Authenticated)
        .unwrap_or(Identity::Guest);

    req.extensions_mut().insert(identity);
    next.run(req).await
}
