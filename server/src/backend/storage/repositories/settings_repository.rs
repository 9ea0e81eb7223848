use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::backend::domain::models::settings::Settings;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::SettingsStorage;

/// Repository for the application settings row
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConnection,
}

impl SettingsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn get_settings(&self, key: &str) -> Result<Option<Settings>> {
        let row = sqlx::query("SELECT key, staff_referral_code FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(Settings {
                key: r.try_get("key")?,
                staff_referral_code: r.try_get("staff_referral_code")?,
            })),
            None => Ok(None),
        }
    }

    async fn upsert_settings(&self, settings: &Settings) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, staff_referral_code)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET staff_referral_code = excluded.staff_referral_code
            "#,
        )
        .bind(&settings.key)
        .bind(&settings.staff_referral_code)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::settings::SETTINGS_KEY;

    #[tokio::test]
    async fn test_upsert_and_get_settings() {
        let db = DbConnection::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db);

        assert!(repo.get_settings(SETTINGS_KEY).await.unwrap().is_none());

        repo.upsert_settings(&Settings::default()).await.unwrap();
        repo.upsert_settings(&Settings::with_referral_code("SHOP-42")).await.unwrap();

        let stored = repo.get_settings(SETTINGS_KEY).await.unwrap().unwrap();
        assert_eq!(stored.staff_referral_code, "SHOP-42");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(repo.db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
