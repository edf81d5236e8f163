//! services/api/src/bin/api.rs

use api_lib::{
    adapters::json_store::{self, JsonFileStore},
    config::Config,
    error::ApiError,
    web::{api_router, state::{AppState, Database}, ApiDoc},
};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Data Directory ---
    info!("Initializing data files in {}...", config.data_dir.display());
    json_store::initialize(&config.data_dir).await?;
    info!("Data files ready.");

    // --- 3. Build the Shared AppState ---
    let db = Database {
        users: Arc::new(JsonFileStore::new(&config.data_dir, "users")),
        plans: Arc::new(JsonFileStore::new(&config.data_dir, "plans")),
        reviews: Arc::new(JsonFileStore::new(&config.data_dir, "reviews")),
        channels: Arc::new(JsonFileStore::new(&config.data_dir, "channels")),
        deals: Arc::new(JsonFileStore::new(&config.data_dir, "deals")),
        payments: Arc::new(JsonFileStore::new(&config.data_dir, "payments")),
    };
    let app_state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // The storefront and the admin panel are served from other origins, so
    // CORS stays fully open. Credentials never ride on cookies here; auth is
    // a bearer header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- 4. Create the Web Router ---
    let api = api_router(app_state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("CreatorHub Deal System running on {}", config.bind_address);
    info!(
        "Health check available at http://{}/api/health",
        config.bind_address
    );
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    info!("Admin login email: {}", config.admin_email);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
