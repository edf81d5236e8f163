//! services/api/src/web/missions.rs
//!
//! Growth missions provisioned by one-time plan purchases. Missions live
//! embedded on the user document; progress is derived per request from the
//! profile's current subscriber count, never persisted.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity::Claims;
use crate::web::state::AppState;
use creatorhub_core::domain::{
    mission_progress, parse_subscriber_count, subscriber_count, Mission, User,
};

/// Progress for one mission given the owning user's profile. Only
/// subscriber missions with a filled-in YouTube profile can make progress.
fn progress_of(user: &User, mission: &Mission) -> u64 {
    let Some(info) = &user.youtube_info else {
        return 0;
    };
    if mission.kind != "subscribers" {
        return 0;
    }

    let current = subscriber_count(&info.current_subscribers);
    let target = parse_subscriber_count(&mission.target_value);
    let initial = parse_subscriber_count(&mission.initial_value);
    mission_progress(current, initial, target)
}

/// GET /api/missions - The caller's active missions with live progress
pub async fn list_missions_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users.load().await?;
    let user = users
        .iter()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let missions: Vec<Mission> = user
        .missions
        .iter()
        .filter(|m| !m.completed)
        .map(|m| Mission {
            progress: progress_of(user, m),
            ..m.clone()
        })
        .collect();

    Ok(Json(missions))
}

/// POST /api/missions/{missionId}/complete - Mark a mission done
pub async fn complete_mission_handler(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(mission_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut users = state.db.users.load().await?;
    let user = users
        .iter_mut()
        .find(|u| u.id == claims.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mission = user
        .missions
        .iter_mut()
        .find(|m| m.id == mission_id)
        .ok_or_else(|| ApiError::NotFound("Mission not found".to_string()))?;

    if mission.completed {
        return Err(ApiError::Validation(
            "Mission already completed".to_string(),
        ));
    }

    mission.completed = true;
    mission.completed_at = Some(Utc::now());
    let completed = mission.clone();

    state.db.users.save(&users).await?;

    Ok(Json(json!({
        "message": "Mission completed successfully!",
        "mission": completed,
    })))
}
