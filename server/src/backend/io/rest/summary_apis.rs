//! # REST API for the Financial Summary
//!
//! `GET /api/summary`: today's, this month's and this year's collections and
//! profit, plus the monthly earnings trend. Admin only.

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
use crate::backend::AppState;

/// Create a router for the summary API
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_financial_summary))
}

pub async fn get_financial_summary(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> impl IntoResponse {
    info!("GET /api/summary - by {}", admin.username);

    match state.report_service.financial_summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
