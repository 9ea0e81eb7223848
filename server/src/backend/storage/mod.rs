//! # Storage Module
//!
//! Handles all data persistence for the repair shop backend.
//!
//! Domain services only see the traits in [`traits`]; the SQLite repositories
//! behind [`DbConnection`] are one implementation of them.
//!
//! ## Layout
//!
//! - **connection**: SQLite pool and idempotent schema setup
//! - **repositories**: records (with spare parts), users, settings
//! - **query**: typed filter, sort and grouping values for record queries
//! - **money** / **timestamp**: column encodings (integer cents, epoch milliseconds)
//! - **photos**: filesystem photo storage

pub mod connection;
pub mod money;
pub mod photos;
pub mod query;
pub mod repositories;
pub mod timestamp;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use photos::FsPhotoStorage;
pub use repositories::{RecordRepository, SettingsRepository, UserRepository};
pub use traits::{Connection, PhotoStorage, RecordStorage, SettingsStorage, UserStorage};
