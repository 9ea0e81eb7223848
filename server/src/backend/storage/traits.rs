//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::record::Record;
use crate::backend::domain::models::settings::Settings;
use crate::backend::domain::models::user::User;
use crate::backend::storage::query::{MonthlyGrouping, MonthlyTotal, RecordFilter, RecordSort, RecordTotals};

/// Trait defining the interface for repair record storage operations
///
/// Implementations persist `total_price` as the service charge plus every part
/// price, each rounded to cents as stored, whatever the in-memory value says.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Store a new record together with its spare parts
    async fn store_record(&self, record: &Record) -> Result<()>;

    /// Retrieve a specific record by ID
    async fn get_record(&self, record_id: &str) -> Result<Option<Record>>;

    /// List records matching `filter`, ordered by `sort`
    async fn list_records(&self, filter: &RecordFilter, sort: RecordSort) -> Result<Vec<Record>>;

    /// Replace an existing record and its spare parts.
    /// Returns false if no record had that ID.
    async fn update_record(&self, record: &Record) -> Result<bool>;

    /// Delete a record by ID
    /// Returns true if the record was found and deleted, false otherwise
    async fn delete_record(&self, record_id: &str) -> Result<bool>;

    /// Count and sums over the records matching `filter`.
    /// An empty match yields zero totals.
    async fn aggregate_totals(&self, filter: &RecordFilter) -> Result<RecordTotals>;

    /// Revenue per calendar month, newest month first, at most `limit` months
    async fn aggregate_monthly(
        &self,
        filter: &RecordFilter,
        grouping: MonthlyGrouping,
        limit: u32,
    ) -> Result<Vec<MonthlyTotal>>;
}

/// Trait defining the interface for user account storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Look up by normalized username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List all users ordered by username
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn count_users(&self) -> Result<i64>;

    /// Returns true if the user was found and deleted
    async fn delete_user(&self, user_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the application settings singleton
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get_settings(&self, key: &str) -> Result<Option<Settings>>;

    /// Insert or replace the settings row
    async fn upsert_settings(&self, settings: &Settings) -> Result<()>;
}

/// Releases the binary behind a photo reference.
/// Releasing something that no longer exists is not an error.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn release(&self, storage_id: &str) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories. This allows the domain
/// layer to work with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    type RecordRepository: RecordStorage + Clone;
    type UserRepository: UserStorage + Clone;
    type SettingsRepository: SettingsStorage + Clone;

    fn create_record_repository(&self) -> Self::RecordRepository;

    fn create_user_repository(&self) -> Self::UserRepository;

    fn create_settings_repository(&self) -> Self::SettingsRepository;
}
