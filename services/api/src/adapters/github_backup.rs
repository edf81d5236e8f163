//! services/api/src/adapters/github_backup.rs
//!
//! This module contains the backup exporter. It archives the whole data
//! directory into a timestamped `.tar.gz` and uploads it to a GitHub
//! repository through the contents API, updating the remote file in place
//! when one with the same name already exists.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use crate::config::Config;

/// Errors raised while producing or uploading a backup archive.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("GITHUB_TOKEN and GITHUB_REPO must be configured")]
    NotConfigured,

    #[error("Archive failure: {0}")]
    Archive(#[from] std::io::Error),

    #[error("Upload failure: {0}")]
    Upload(#[from] reqwest::Error),

    #[error("GitHub rejected the upload with {0}: {1}")]
    Rejected(StatusCode, String),
}

//=========================================================================================
// The Exporter Struct
//=========================================================================================

/// Pushes data-directory snapshots to a GitHub repository.
#[derive(Clone)]
pub struct GithubBackup {
    client: reqwest::Client,
    token: String,
    repo: String,
    branch: String,
}

impl GithubBackup {
    /// Builds an exporter from configuration. Both the token and the target
    /// repository must be present.
    pub fn from_config(config: &Config) -> Result<Self, BackupError> {
        let (token, repo) = match (&config.github_token, &config.github_repo) {
            (Some(token), Some(repo)) => (token.clone(), repo.clone()),
            _ => return Err(BackupError::NotConfigured),
        };
        let client = reqwest::Client::builder()
            .user_agent("creatorhub-backup")
            .build()?;
        Ok(Self {
            client,
            token,
            repo,
            branch: config.github_branch.clone(),
        })
    }

    /// Archives `data_dir` and uploads the result. Returns the path of the
    /// uploaded file inside the repository.
    pub async fn export(
        &self,
        data_dir: PathBuf,
        backup_dir: PathBuf,
    ) -> Result<String, BackupError> {
        // The tar and gzip writers are blocking, so keep them off the runtime.
        let (archive_path, file_name) =
            tokio::task::spawn_blocking(move || archive_data_dir(&data_dir, &backup_dir))
                .await
                .map_err(|e| {
                    BackupError::Archive(std::io::Error::new(std::io::ErrorKind::Other, e))
                })??;
        self.push(&archive_path, &file_name).await
    }

    async fn push(&self, archive_path: &Path, file_name: &str) -> Result<String, BackupError> {
        let url = format!(
            "https://api.github.com/repos/{}/contents/backup/{}",
            self.repo, file_name
        );
        let content = BASE64.encode(tokio::fs::read(archive_path).await?);

        // Reuse the existing blob's sha so a same-named upload replaces it.
        let sha = match self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["sha"].as_str().map(str::to_owned)),
            _ => None,
        };

        let mut body = json!({
            "message": format!("Backup: {file_name}"),
            "content": content,
            "branch": self.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = json!(sha);
        }

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(BackupError::Rejected(status, detail));
        }

        let payload: Value = resp.json().await?;
        Ok(payload["content"]["path"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

//=========================================================================================
// Archive Creation
//=========================================================================================

/// Packs the contents of `data_dir` into `<backup_dir>/backup-<millis>.tar.gz`.
///
/// The collection files sit at the archive root, without a wrapping
/// directory entry.
pub fn archive_data_dir(
    data_dir: &Path,
    backup_dir: &Path,
) -> Result<(PathBuf, String), BackupError> {
    std::fs::create_dir_all(backup_dir)?;

    let file_name = format!("backup-{}.tar.gz", Utc::now().timestamp_millis());
    let archive_path = backup_dir.join(&file_name);

    let file = std::fs::File::create(&archive_path)?;
    let encoder = GzEncoder::new(file, Compression::best());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", data_dir)?;
    builder.into_inner()?.finish()?;

    Ok((archive_path, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    #[test]
    fn archive_round_trips_the_data_directory() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("database");
        let backup_dir = root.path().join("backup");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("users.json"), br#"[{"id":1}]"#).unwrap();
        std::fs::write(data_dir.join("plans.json"), b"[]").unwrap();

        let (archive_path, file_name) = archive_data_dir(&data_dir, &backup_dir).unwrap();
        assert!(file_name.starts_with("backup-"));
        assert!(file_name.ends_with(".tar.gz"));
        assert!(archive_path.exists());

        let unpacked = root.path().join("unpacked");
        let reader = GzDecoder::new(std::fs::File::open(&archive_path).unwrap());
        tar::Archive::new(reader).unpack(&unpacked).unwrap();

        let restored = std::fs::read_to_string(unpacked.join("users.json")).unwrap();
        assert_eq!(restored, r#"[{"id":1}]"#);
        assert!(unpacked.join("plans.json").exists());
    }

    #[test]
    fn exporter_requires_token_and_repo() {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            data_dir: PathBuf::from("./database"),
            backup_dir: PathBuf::from("./backup"),
            log_level: tracing::Level::INFO,
            jwt_secret: "secret".to_string(),
            admin_email: "admin@creatorhub.com".to_string(),
            github_token: None,
            github_repo: Some("owner/repo".to_string()),
            github_branch: "main".to_string(),
        };
        assert!(matches!(
            GithubBackup::from_config(&config),
            Err(BackupError::NotConfigured)
        ));
    }
}
