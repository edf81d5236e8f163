//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 specification for the deal-system API to
//! `openapi.json`, for clients that want the schema without a running server.

use api_lib::web::docs::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = "openapi.json";
    let spec = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, spec)?;
    println!("✅ OpenAPI specification generated at {}", path);
    Ok(())
}
