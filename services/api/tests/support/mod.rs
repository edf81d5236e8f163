//! services/api/tests/support/mod.rs
//!
//! Harness for driving the full router in-process against a throwaway data
//! directory. No server is started; requests go straight through the tower
//! service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use tracing::Level;

use api_lib::adapters::json_store::{self, JsonFileStore};
use api_lib::config::Config;
use api_lib::web::{api_router, AppState, Database};

pub struct TestApp {
    router: Router,
    data_dir: TempDir,
}

impl TestApp {
    /// Builds a router over a fresh seeded data directory.
    pub async fn spawn() -> Self {
        let data_dir = TempDir::new().expect("temp data dir");
        json_store::initialize(data_dir.path())
            .await
            .expect("initialize data files");

        let config = Config {
            bind_address: "127.0.0.1:0".parse::<SocketAddr>().expect("bind address"),
            data_dir: data_dir.path().to_path_buf(),
            backup_dir: data_dir.path().join("backup"),
            log_level: Level::ERROR,
            jwt_secret: "test-secret".to_string(),
            admin_email: "admin@creatorhub.com".to_string(),
            github_token: None,
            github_repo: None,
            github_branch: "main".to_string(),
        };

        let db = Database {
            users: Arc::new(JsonFileStore::new(data_dir.path(), "users")),
            plans: Arc::new(JsonFileStore::new(data_dir.path(), "plans")),
            reviews: Arc::new(JsonFileStore::new(data_dir.path(), "reviews")),
            channels: Arc::new(JsonFileStore::new(data_dir.path(), "channels")),
            deals: Arc::new(JsonFileStore::new(data_dir.path(), "deals")),
            payments: Arc::new(JsonFileStore::new(data_dir.path(), "payments")),
        };
        let state = Arc::new(AppState {
            db,
            config: Arc::new(config),
        });

        Self {
            router: api_router(state),
            data_dir,
        }
    }

    /// Sends one request and returns the status plus the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, None, Some(body)).await
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None, None).await
    }

    /// Registers an account and returns its token and id.
    pub async fn register(&self, name: &str, email: &str, whatsapp: &str) -> (String, u64) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                serde_json::json!({
                    "fullName": name,
                    "email": email,
                    "whatsappNumber": whatsapp,
                    "password": "password123",
                    "confirmPassword": "password123",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let token = body["token"].as_str().expect("token").to_string();
        let id = body["user"]["id"].as_u64().expect("user id");
        (token, id)
    }

    /// Reads a collection file straight off disk.
    pub fn read_collection(&self, collection: &str) -> Value {
        let raw = std::fs::read(self.data_dir.path().join(format!("{collection}.json")))
            .expect("collection file");
        serde_json::from_slice(&raw).expect("collection json")
    }

    /// Overwrites a collection file, for seeding data that has no write route.
    pub fn write_collection(&self, collection: &str, items: Value) {
        let raw = serde_json::to_vec_pretty(&items).expect("collection json");
        std::fs::write(
            self.data_dir.path().join(format!("{collection}.json")),
            raw,
        )
        .expect("collection file");
    }
}
