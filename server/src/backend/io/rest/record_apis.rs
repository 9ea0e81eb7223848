//! # REST API for Repair Records
//!
//! Any signed-in user can list, read and create records; only admins can
//! change or delete them. `totalPrice` in request bodies is ignored.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::backend::domain::commands::records::RecordListQuery;
use crate::backend::io::rest::auth::{AdminUser, AuthUser};
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::RecordMapper;
use crate::backend::AppState;
use shared::{CreateRecordRequest, DeleteRecordResponse, PaymentStatus, UpdateRecordRequest};

/// Query parameters for record listing
#[derive(Debug, Deserialize)]
pub struct RecordListParams {
    pub status: Option<PaymentStatus>,
}

/// Create a router for record related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record).put(update_record).delete(delete_record))
}

/// List records, newest first
pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<RecordListParams>,
) -> impl IntoResponse {
    info!("GET /api/records - query: {:?}", params);

    let query = RecordListQuery {
        payment_status: params.status.map(RecordMapper::to_domain_status),
    };

    match state.record_service.list_records(query).await {
        Ok(records) => {
            let response: Vec<shared::Record> = records.into_iter().map(RecordMapper::to_dto).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create a record owned by the caller
pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    info!("POST /api/records - request: {:?}", request);

    let command = RecordMapper::to_create_command(request);
    match state.record_service.create_record(command, &user.id).await {
        Ok(record) => (StatusCode::CREATED, Json(RecordMapper::to_dto(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_record(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/records/{}", id);

    match state.record_service.get_record(&id).await {
        Ok(record) => (StatusCode::OK, Json(RecordMapper::to_dto(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_record(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateRecordRequest>,
) -> impl IntoResponse {
    info!("PUT /api/records/{} - request: {:?}", id, request);

    let command = RecordMapper::to_update_command(request);
    match state.record_service.update_record(&id, command).await {
        Ok(record) => (StatusCode::OK, Json(RecordMapper::to_dto(record))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_record(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/records/{}", id);

    match state.record_service.delete_record(&id).await {
        Ok(record) => {
            let response = DeleteRecordResponse {
                id: record.id,
                message: "Record removed".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
