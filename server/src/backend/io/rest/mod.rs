//! # REST API Interface Layer
//!
//! Provides the HTTP endpoints of the repair shop backend.
//! This layer handles:
//! - JSON request/response serialization (camelCase DTOs from `shared`)
//! - Bearer-token authentication and the admin guard
//! - Translation of domain errors into status codes and `{"message"}` bodies
//! - Request logging
//!
//! Handlers contain no business logic: they map DTOs to domain commands,
//! call one service method and map the result back.

pub mod analysis_apis;
pub mod auth;
pub mod auth_apis;
pub mod error;
pub mod mappers;
pub mod record_apis;
pub mod settings_apis;
pub mod summary_apis;
pub mod user_apis;

pub use error::ApiError;
