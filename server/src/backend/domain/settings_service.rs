//! Settings service: the staff referral code.
use std::sync::Arc;

use tracing::info;

use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::settings::{Settings, SETTINGS_KEY};
use crate::backend::storage::{Connection, SettingsStorage};

#[derive(Clone)]
pub struct SettingsService<C: Connection> {
    settings_repository: C::SettingsRepository,
}

impl<C: Connection> SettingsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            settings_repository: connection.create_settings_repository(),
        }
    }

    /// Current settings, created with the default referral code on first access
    pub async fn get_settings(&self) -> DomainResult<Settings> {
        if let Some(settings) = self.settings_repository.get_settings(SETTINGS_KEY).await? {
            return Ok(settings);
        }

        let settings = Settings::default();
        self.settings_repository.upsert_settings(&settings).await?;
        info!("Created default settings");
        Ok(settings)
    }

    pub async fn update_referral_code(&self, code: Option<String>) -> DomainResult<Settings> {
        let code = code.as_deref().map(str::trim).unwrap_or_default();
        if code.is_empty() {
            return Err(DomainError::validation("Referral code cannot be empty"));
        }

        let settings = Settings::with_referral_code(code);
        self.settings_repository.upsert_settings(&settings).await?;
        info!("Updated staff referral code");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::settings::DEFAULT_REFERRAL_CODE;
    use crate::backend::storage::DbConnection;

    async fn create_test_service() -> SettingsService<DbConnection> {
        let db = Arc::new(DbConnection::in_memory().await.unwrap());
        SettingsService::new(db)
    }

    #[tokio::test]
    async fn test_settings_created_lazily() {
        let service = create_test_service().await;
        let settings = service.get_settings().await.unwrap();

        assert_eq!(settings.key, SETTINGS_KEY);
        assert_eq!(settings.staff_referral_code, DEFAULT_REFERRAL_CODE);
    }

    #[tokio::test]
    async fn test_update_referral_code() {
        let service = create_test_service().await;

        let updated = service.update_referral_code(Some("  SHOP-2024 ".to_string())).await.unwrap();
        assert_eq!(updated.staff_referral_code, "SHOP-2024");
        assert_eq!(service.get_settings().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_blank_referral_code_rejected() {
        let service = create_test_service().await;

        for code in [None, Some(String::new()), Some("   ".to_string())] {
            let result = service.update_referral_code(code).await;
            assert!(matches!(result, Err(DomainError::Validation(msg)) if msg == "Referral code cannot be empty"));
        }
    }
}
