//! # Domain Module
//!
//! Contains all business logic for the repair shop backend.
//!
//! Services are generic over a storage [`Connection`](crate::backend::storage::Connection)
//! and know nothing about HTTP. They return [`DomainError`] so the REST layer
//! can map caller mistakes and server faults to different status codes.
//!
//! ## Module Organization
//!
//! - **record_service**: repair ticket CRUD and the total-price invariant
//! - **report_service**: collections, profit, trend and analysis reports
//! - **auth_service**: registration, login and bearer tokens
//! - **user_service** / **settings_service**: admin-only management
//! - **calendar**: report day/month/year boundaries in the reporting offset
//! - **commands**: service inputs, mapped from the `shared` DTOs
//! - **models**: domain entities
//!
//! ## Business Rules
//!
//! - `total_price` is always `service_charge + sum(spare part prices)`
//! - Only `Paid` records count towards any report
//! - The first registered user is the admin; later users need the referral code

pub mod auth_service;
pub mod calendar;
pub mod commands;
pub mod error;
pub mod models;
pub mod record_service;
pub mod report_service;
pub mod settings_service;
pub mod user_service;

pub use auth_service::{AuthOptions, AuthService, AuthSession};
pub use calendar::ReportCalendar;
pub use error::{DomainError, DomainResult};
pub use record_service::RecordService;
pub use report_service::ReportService;
pub use settings_service::SettingsService;
pub use user_service::UserService;
