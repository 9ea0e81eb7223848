//! # REST API for Settings
//!
//! Admin-only access to the staff referral code.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::backend::io::rest::auth::AdminUser;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;
use shared::UpdateSettingsRequest;

/// Create a router for settings APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

pub async fn get_settings(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> impl IntoResponse {
    info!("GET /api/settings");

    match state.settings_service.get_settings().await {
        Ok(settings) => (StatusCode::OK, Json(UserMapper::settings_to_dto(settings))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings - by {}", admin.username);

    match state.settings_service.update_referral_code(request.staff_referral_code).await {
        Ok(settings) => (StatusCode::OK, Json(UserMapper::settings_to_dto(settings))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
