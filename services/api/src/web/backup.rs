//! services/api/src/web/backup.rs
//!
//! On-demand export of the data directory to GitHub.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::adapters::GithubBackup;
use crate::web::state::AppState;

/// GET /api/backup/github - Archive the data directory and push it
///
/// Any failure, missing configuration included, answers 500 with the
/// underlying reason in `details`.
#[utoipa::path(
    get,
    path = "/api/backup/github",
    responses(
        (status = 200, description = "Uploaded; the repository path is returned"),
        (status = 500, description = "Archive or upload failed")
    )
)]
pub async fn github_backup_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = match GithubBackup::from_config(&state.config) {
        Ok(exporter) => {
            exporter
                .export(
                    state.config.data_dir.clone(),
                    state.config.backup_dir.clone(),
                )
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(path) => (StatusCode::OK, Json(json!({ "success": true, "path": path }))),
        Err(e) => {
            error!("Backup error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Backup failed", "details": e.to_string() })),
            )
        }
    }
}
