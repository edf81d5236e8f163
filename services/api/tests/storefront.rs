//! services/api/tests/storefront.rs
//!
//! The public surface: health, home aggregate, plan catalogue, review wall,
//! channel listings and the backup trigger.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::TestApp;

#[tokio::test]
async fn health_answers_ok() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "CreatorHub Deal System API is running");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn catalogue_serves_only_active_plans() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/plans").await;
    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().expect("plan list");
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[1]["name"], "100K Subscribers Deal");
    assert_eq!(plans[1]["price"], 499.99);
    assert_eq!(plans[1]["popular"], true);

    // Retiring a plan hides it from the listing but not from direct lookup.
    let (status, _) = app.put("/api/admin/plans/1", json!({ "active": false })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/plans").await;
    assert_eq!(body.as_array().expect("plan list").len(), 2);

    let (status, body) = app.get("/api/plans/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "10K Subscribers Deal");

    let (status, body) = app.get("/api/plans/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Plan not found");
}

#[tokio::test]
async fn custom_plans_are_quoted_but_never_stored() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/plans/custom",
            json!({
                "name": "Shorts Push",
                "features": ["Daily shorts schedule", "Trend research"],
                "basePrice": 150.0,
                "customizations": [
                    { "name": "Thumbnail pack", "additionalPrice": 25.0 },
                    { "additionalPrice": 10.0 },
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Custom plan created");
    assert_eq!(body["plan"]["name"], "Custom Shorts Push");
    assert_eq!(body["plan"]["price"], 185.0);
    assert_eq!(body["plan"]["isCustom"], true);

    // The quote never lands in the catalogue.
    let (_, body) = app.get("/api/plans").await;
    assert_eq!(body.as_array().expect("plan list").len(), 3);

    let (status, body) = app
        .post(
            "/api/plans/custom",
            json!({ "name": "No Price", "features": ["Something"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, features, and base price are required");

    let (status, body) = app
        .post(
            "/api/plans/custom",
            json!({ "name": "No Features", "basePrice": 80.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, features, and base price are required");
}

#[tokio::test]
async fn review_wall_shows_only_approved_reviews() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register("Maya Creator", "maya@example.com", "+15550001111")
        .await;

    let (status, body) = app
        .post_auth(
            "/api/reviews",
            &token,
            json!({ "rating": 5, "comment": "Grew faster than I hoped" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["message"],
        "Review submitted successfully. It will be visible after admin approval."
    );
    let review_id = body["review"]["id"].as_u64().expect("review id");
    assert_eq!(body["review"]["name"], "Maya Creator");
    assert_eq!(body["review"]["approved"], false);

    // Invisible until an admin signs off.
    let (_, body) = app.get("/api/reviews").await;
    assert_eq!(body.as_array().expect("review list").len(), 0);

    let (status, _) = app
        .put(&format!("/api/admin/reviews/{review_id}/approve"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/reviews").await;
    let wall = body.as_array().expect("review list");
    assert_eq!(wall.len(), 1);
    assert_eq!(wall[0]["name"], "Maya Creator");
}

#[tokio::test]
async fn review_submission_is_guarded_and_validated() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/reviews", json!({ "rating": 5, "comment": "Nice" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token required");

    let (status, body) = app
        .post_auth(
            "/api/reviews",
            "garbage-token",
            json!({ "rating": 5, "comment": "Nice" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid token");

    let (token, _) = app
        .register("Maya Creator", "maya@example.com", "+15550001111")
        .await;

    let (status, body) = app
        .post_auth("/api/reviews", &token, json!({ "comment": "Missing rating" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating and comment are required");

    let (status, body) = app
        .post_auth("/api/reviews", &token, json!({ "rating": 7, "comment": "Too high" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating must be between 1 and 5");

    // Ratings may arrive as numeric strings.
    let (status, _) = app
        .post_auth("/api/reviews", &token, json!({ "rating": "4", "comment": "Solid" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post_auth("/api/reviews", &token, json!({ "rating": 5, "comment": "Again" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have already submitted a review");
}

#[tokio::test]
async fn review_likes_accumulate() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register("Maya Creator", "maya@example.com", "+15550001111")
        .await;
    let (_, body) = app
        .post_auth("/api/reviews", &token, json!({ "rating": 5, "comment": "Great" }))
        .await;
    let review_id = body["review"]["id"].as_u64().expect("review id");

    let (status, body) = app
        .post(&format!("/api/reviews/{review_id}/like"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review liked");
    assert_eq!(body["likes"], 1);

    let (_, body) = app
        .post(&format!("/api/reviews/{review_id}/like"), json!({}))
        .await;
    assert_eq!(body["likes"], 2);

    let (status, body) = app.post("/api/reviews/999/like", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Review not found");
}

#[tokio::test]
async fn channel_listings_filter_active_and_promoted() {
    let app = TestApp::spawn().await;
    app.write_collection(
        "channels",
        json!([
            {
                "id": 1,
                "name": "TechDaily",
                "subscribers": "1.2M",
                "category": "Technology",
                "promoted": true,
                "active": true
            },
            { "id": 2, "name": "CookRight", "promoted": false, "active": true },
            { "id": 3, "name": "GoneDark", "promoted": true, "active": false },
        ]),
    );

    let (status, body) = app.get("/api/channels").await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("channel list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "TechDaily");
    assert_eq!(listed[1]["name"], "CookRight");

    let (_, body) = app.get("/api/channels/promoted").await;
    let promoted = body.as_array().expect("channel list");
    assert_eq!(promoted.len(), 1);
    assert_eq!(promoted[0]["name"], "TechDaily");

    // The landing page keeps promoted channels even while inactive.
    let (_, body) = app.get("/api/home").await;
    let strip = body["promotedChannels"].as_array().expect("promoted strip");
    assert_eq!(strip.len(), 2);
}

#[tokio::test]
async fn home_aggregates_catalogue_reviews_and_stats() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/home").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plans"].as_array().expect("plans").len(), 3);
    assert_eq!(body["reviews"].as_array().expect("reviews").len(), 0);
    assert_eq!(body["stats"]["totalCreators"], "50K+");
    assert_eq!(body["stats"]["revenueGenerated"], "$125M+");
}

#[tokio::test]
async fn backup_without_configuration_reports_failure() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/backup/github").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Backup failed");
    assert_eq!(body["details"], "GITHUB_TOKEN and GITHUB_REPO must be configured");
}
