//! Repair shop records and reporting backend.
//!
//! - [`backend`]: storage, domain services and the REST layer
//! - [`config`]: YAML + environment configuration
//! - [`logging`]: tracing subscriber setup

pub mod backend;
pub mod config;
pub mod logging;

pub use backend::{create_router, initialize_backend, AppState};
pub use config::AppConfig;
