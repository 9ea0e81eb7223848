use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

use crate::backend::storage::repositories::{RecordRepository, SettingsRepository, UserRepository};
use crate::backend::storage::traits::Connection;

// The database URL used when no configuration is supplied
pub const DEFAULT_DATABASE_URL: &str = "sqlite:repair_shop.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DEFAULT_DATABASE_URL, 5).await
    }

    /// A private in-memory database, used by tests.
    ///
    /// Each in-memory SQLite connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Money columns hold integer cents, timestamps hold epoch milliseconds
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                date INTEGER NOT NULL,
                mobile_model TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                customer_phone TEXT,
                complaint TEXT NOT NULL,
                service_charge INTEGER NOT NULL DEFAULT 0,
                total_price INTEGER NOT NULL DEFAULT 0,
                payment_status TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (payment_status IN ('Paid', 'Pending')),
                before_photo_url TEXT,
                before_photo_storage_id TEXT,
                after_photo_url TEXT,
                after_photo_storage_id TEXT,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Reports filter on payment status and service date
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_status_date
            ON records(payment_status, date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_created_at
            ON records(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS spare_parts (
                record_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                price INTEGER NOT NULL,
                PRIMARY KEY (record_id, position),
                FOREIGN KEY (record_id) REFERENCES records (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('Admin', 'Staff')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                staff_referral_code TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type RecordRepository = RecordRepository;
    type UserRepository = UserRepository;
    type SettingsRepository = SettingsRepository;

    fn create_record_repository(&self) -> Self::RecordRepository {
        RecordRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_settings_repository(&self) -> Self::SettingsRepository {
        SettingsRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::in_memory().await.unwrap();
        DbConnection::setup_schema(db.pool()).await.unwrap();

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('records', 'spare_parts', 'users', 'settings')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("shop.db").display());

        let db = DbConnection::new(&url, 2).await.unwrap();

        assert!(dir.path().join("shop.db").exists());
        drop(db);
    }
}
