//! services/api/src/adapters/json_store.rs
//!
//! This module contains the flat-file storage adapter, which is the concrete
//! implementation of the `Store` port from the `core` crate. Each collection
//! lives in its own pretty-printed JSON array file inside the data directory.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use creatorhub_core::domain::Plan;
use creatorhub_core::ports::{Store, StoreError, StoreResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed store that implements the `Store` port for one collection.
///
/// Reads and writes always cover the whole file. Concurrent writers are not
/// coordinated; the last save wins.
#[derive(Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonFileStore<T> {
    /// Creates a store for `<data_dir>/<collection>.json`.
    pub fn new(data_dir: &Path, collection: &str) -> Self {
        Self {
            path: data_dir.join(format!("{collection}.json")),
            _marker: PhantomData,
        }
    }
}

//=========================================================================================
// `Store` Trait Implementation
//=========================================================================================

#[async_trait]
impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> StoreResult<Vec<T>> {
        // A missing, unreadable or malformed file reads as an empty collection.
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return Ok(Vec::new()),
        };
        Ok(serde_json::from_slice(&raw).unwrap_or_default())
    }

    async fn save(&self, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(items)
            .map_err(|e| StoreError::Serde(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// Startup Initialization
//=========================================================================================

/// The subscriber-growth plans a fresh deployment starts with.
pub fn launch_catalogue() -> Vec<Plan> {
    let now = Utc::now();
    let plan = |id: u64, name: &str, price: f64, description: &str, features: &[&str], popular: bool| Plan {
        id,
        name: name.to_string(),
        price,
        description: description.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        period: None,
        plan_type: None,
        popular,
        active: true,
        customizations: None,
        is_custom: false,
        created_at: Some(now),
        updated_at: None,
    };

    vec![
        plan(
            1,
            "10K Subscribers Deal",
            99.99,
            "Get 10,000 real YouTube subscribers",
            &[
                "10,000 real subscribers",
                "Organic growth strategy",
                "30-day delivery",
                "Money-back guarantee",
                "24/7 support",
            ],
            false,
        ),
        plan(
            2,
            "100K Subscribers Deal",
            499.99,
            "Reach 100,000 YouTube subscribers fast",
            &[
                "100,000 real subscribers",
                "Advanced growth tactics",
                "60-day delivery",
                "Channel optimization",
                "Priority support",
                "Analytics tracking",
            ],
            true,
        ),
        plan(
            3,
            "1M Subscribers Deal",
            1999.99,
            "Ultimate growth package for 1 million subscribers",
            &[
                "1,000,000 real subscribers",
                "Complete channel makeover",
                "90-day delivery",
                "Personal growth manager",
                "Custom content strategy",
                "Monetization guidance",
                "Brand partnership opportunities",
            ],
            false,
        ),
    ]
}

/// Creates the data directory and seeds any missing collection files.
/// Existing files are never touched, so restarts keep their data.
pub async fn initialize(data_dir: &Path) -> StoreResult<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| StoreError::Io(e.to_string()))?;

    let plans_path = data_dir.join("plans.json");
    if !file_exists(&plans_path).await? {
        let seed = serde_json::to_vec_pretty(&launch_catalogue())
            .map_err(|e| StoreError::Serde(e.to_string()))?;
        tokio::fs::write(&plans_path, seed)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
    }

    for collection in ["users", "reviews", "channels", "deals", "payments"] {
        let path = data_dir.join(format!("{collection}.json"));
        if !file_exists(&path).await? {
            tokio::fs::write(&path, b"[]")
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
    }

    Ok(())
}

async fn file_exists(path: &Path) -> StoreResult<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| StoreError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorhub_core::domain::Review;

    #[tokio::test]
    async fn load_of_a_missing_file_is_an_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFileStore<Review> = JsonFileStore::new(dir.path(), "reviews");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_of_a_corrupt_file_is_an_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("reviews.json"), b"{ not json").unwrap();
        let store: JsonFileStore<Review> = JsonFileStore::new(dir.path(), "reviews");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_documents_come_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFileStore<Plan> = JsonFileStore::new(dir.path(), "plans");

        let plans = launch_catalogue();
        store.save(&plans).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[1].name, "100K Subscribers Deal");
        assert_eq!(loaded[1].price, 499.99);
        assert!(loaded[1].popular);
        assert_eq!(loaded[2].features.len(), 7);
    }

    #[tokio::test]
    async fn initialize_seeds_plans_and_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        initialize(dir.path()).await.unwrap();

        let plans: JsonFileStore<Plan> = JsonFileStore::new(dir.path(), "plans");
        assert_eq!(plans.load().await.unwrap().len(), 3);

        for collection in ["users", "reviews", "channels", "deals", "payments"] {
            let raw = std::fs::read_to_string(dir.path().join(format!("{collection}.json"))).unwrap();
            assert_eq!(raw, "[]");
        }
    }

    #[tokio::test]
    async fn initialize_never_overwrites_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        initialize(dir.path()).await.unwrap();

        let store: JsonFileStore<Plan> = JsonFileStore::new(dir.path(), "plans");
        let mut plans = store.load().await.unwrap();
        plans.retain(|p| p.id != 3);
        store.save(&plans).await.unwrap();

        initialize(dir.path()).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 2);
    }
}
