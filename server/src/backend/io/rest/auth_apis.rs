//! # REST API for Authentication
//!
//! Public endpoints for registering and logging in.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::backend::domain::commands::users::{LoginCommand, RegisterCommand};
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;
use shared::{LoginRequest, RegisterRequest};

/// Create a router for auth related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user. The first account ever becomes the admin.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - username: {}", request.username);

    let command = RegisterCommand {
        username: request.username,
        password: request.password,
        referral_code: request.referral_code,
    };

    match state.auth_service.register(command).await {
        Ok(session) => (StatusCode::CREATED, Json(UserMapper::to_auth_response(session))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - username: {}", request.username);

    let command = LoginCommand {
        username: request.username,
        password: request.password,
    };

    match state.auth_service.login(command).await {
        Ok(session) => (StatusCode::OK, Json(UserMapper::to_auth_response(session))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
