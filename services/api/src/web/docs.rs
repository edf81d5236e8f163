//! services/api/src/web/docs.rs
//!
//! The master definition for the OpenAPI specification. Annotated paths
//! cover the public surface; the token-guarded routes are exercised through
//! the client apps and are not documented here.

use utoipa::OpenApi;

use crate::web::{admin, auth, backup, channels, dashboard, deals, home, plans, reviews};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::me_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,
        plans::list_plans_handler,
        plans::get_plan_handler,
        plans::custom_plan_handler,
        reviews::list_reviews_handler,
        reviews::like_review_handler,
        channels::list_channels_handler,
        channels::promoted_channels_handler,
        home::home_handler,
        home::health_handler,
        backup::github_backup_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            plans::CustomPlanRequest,
            reviews::SubmitReviewRequest,
            deals::CreateDealRequest,
            dashboard::UpdateYoutubeRequest,
            admin::UpdateDealStatusRequest,
            admin::CreatePlanRequest,
            admin::CreateReviewRequest,
        )
    ),
    tags(
        (name = "CreatorHub Deal System API", description = "API endpoints for the creator growth marketplace.")
    )
)]
pub struct ApiDoc;
