//! # Backend Module
//!
//! Contains all server-side logic of the repair shop backend.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: business rules for records, reports, users and settings
//! - **Storage**: SQLite persistence and photo storage
//! - **IO**: the REST interface
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST handlers, extractors, mappers)
//!     ↓
//! Domain Layer (services, models, commands)
//!     ↓
//! Storage Layer (SQLite repositories, photo storage)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use chrono::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::backend::domain::{
    AuthOptions, AuthService, RecordService, ReportCalendar, ReportService, SettingsService, UserService,
};
use crate::backend::io::rest::{analysis_apis, auth_apis, record_apis, settings_apis, summary_apis, user_apis};
use crate::backend::storage::{DbConnection, FsPhotoStorage, PhotoStorage};
use crate::config::AppConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub record_service: RecordService<DbConnection>,
    pub report_service: ReportService<DbConnection>,
    pub auth_service: AuthService<DbConnection>,
    pub user_service: UserService<DbConnection>,
    pub settings_service: SettingsService<DbConnection>,
}

impl AppState {
    /// Wire all services onto one database connection
    pub fn new(db: DbConnection, photo_storage: Arc<dyn PhotoStorage>, config: &AppConfig) -> Result<Self> {
        let connection = Arc::new(db);
        let calendar = ReportCalendar::new(config.reporting_offset()?);
        let auth_options = AuthOptions {
            jwt_secret: config.jwt_secret()?.to_string(),
            token_ttl: Duration::days(config.auth.token_ttl_days),
            bcrypt_cost: config.auth.bcrypt_cost,
        };

        Ok(Self {
            record_service: RecordService::new(connection.clone(), photo_storage),
            report_service: ReportService::new(connection.clone(), calendar),
            auth_service: AuthService::new(connection.clone(), auth_options),
            user_service: UserService::new(connection.clone(), config.auth.bcrypt_cost),
            settings_service: SettingsService::new(connection),
        })
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database.url);
    let db = DbConnection::new(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    info!("Photo storage rooted at {}", config.storage.uploads_dir);
    let photo_storage = Arc::new(FsPhotoStorage::new(&config.storage.uploads_dir));

    info!("Setting up application state (reporting offset {})", config.reporting.utc_offset);
    AppState::new(db, photo_storage, config)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", config.cors.allowed_origin))?;

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/records", record_apis::router())
        .nest("/summary", summary_apis::router())
        .nest("/analysis", analysis_apis::router())
        .nest("/settings", settings_apis::router())
        .nest("/users", user_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
