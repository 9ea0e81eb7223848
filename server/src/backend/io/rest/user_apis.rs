//! # REST API for User Management
//!
//! Admin-only listing, staff creation and deletion of accounts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use tracing::info;

use crate::backend::domain::commands::users::CreateStaffCommand;
use crate::backend::io::rest::auth::AdminUser;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;
use shared::{CreateStaffRequest, MessageResponse};

/// Create a router for user management APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/staff", post(create_staff))
        .route("/:id", delete(delete_user))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> impl IntoResponse {
    info!("GET /api/users");

    match state.user_service.list_users().await {
        Ok(users) => {
            let response: Vec<shared::User> = users.into_iter().map(UserMapper::to_dto).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_staff(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(request): Json<CreateStaffRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/staff - username: {}", request.username);

    let command = CreateStaffCommand {
        username: request.username,
        password: request.password,
    };

    match state.user_service.create_staff(command).await {
        Ok(user) => (StatusCode::CREATED, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{} - by {}", id, admin.username);

    match state.user_service.delete_user(&admin.id, &id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("User removed"))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
