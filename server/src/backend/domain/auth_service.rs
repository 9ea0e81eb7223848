//! Authentication domain logic: registration, login and bearer tokens.
//!
//! The very first account becomes the admin and seeds the settings row.
//! Everyone after that registers as staff with the shop's referral code.
//! Tokens are HS256 JWTs whose subject is the user id; the user is looked up
//! again on every request, so deleted accounts lose access immediately.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::domain::commands::users::{LoginCommand, RegisterCommand};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::settings::{Settings, INITIAL_REFERRAL_CODE, SETTINGS_KEY};
use crate::backend::domain::models::user::{User, UserRole};
use crate::backend::storage::{Connection, SettingsStorage, UserStorage};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Token and password hashing parameters
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

/// JWT payload
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// An authenticated user together with a freshly issued token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService<C: Connection> {
    user_repository: C::UserRepository,
    settings_repository: C::SettingsRepository,
    options: AuthOptions,
}

impl<C: Connection> AuthService<C> {
    pub fn new(connection: Arc<C>, options: AuthOptions) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            settings_repository: connection.create_settings_repository(),
            options,
        }
    }

    pub async fn register(&self, command: RegisterCommand) -> DomainResult<AuthSession> {
        let username = User::normalize_username(&command.username);
        validate_credentials(&username, &command.password)?;

        if self.user_repository.get_user_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }

        // Two concurrent first registrations can both see an empty table; not guarded.
        let role = if self.user_repository.count_users().await? == 0 {
            UserRole::Admin
        } else {
            self.check_referral_code(command.referral_code.as_deref()).await?;
            UserRole::Staff
        };

        let password_hash = hash_password(&command.password, self.options.bcrypt_cost).await?;
        let now = Utc::now().trunc_subsecs(3);
        let user = User {
            id: User::generate_id(),
            username,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        };
        self.user_repository.store_user(&user).await?;

        if role == UserRole::Admin {
            self.settings_repository
                .upsert_settings(&Settings::with_referral_code(INITIAL_REFERRAL_CODE))
                .await?;
            info!("Registered first user {} as admin and seeded settings", user.username);
        } else {
            info!("Registered staff user {}", user.username);
        }

        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    pub async fn login(&self, command: LoginCommand) -> DomainResult<AuthSession> {
        let username = User::normalize_username(&command.username);
        let Some(user) = self.user_repository.get_user_by_username(&username).await? else {
            warn!("Login attempt for unknown user {}", username);
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&command.password, &user.password_hash).await? {
            warn!("Failed login for {}", username);
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("User {} logged in", user.username);
        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to the current state of its user
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let key = DecodingKey::from_secret(self.options.jwt_secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &Validation::default())
            .map_err(|e| {
                warn!("Rejected bearer token: {}", e);
                DomainError::unauthorized("Not authorized, token failed")
            })?
            .claims;

        self.user_repository
            .get_user(&claims.sub)
            .await?
            .ok_or_else(|| DomainError::unauthorized("Not authorized, user not found"))
    }

    pub fn issue_token(&self, user: &User) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            iat: now.timestamp(),
            exp: (now + self.options.token_ttl).timestamp(),
        };
        let key = EncodingKey::from_secret(self.options.jwt_secret.as_bytes());
        let token = encode(&Header::default(), &claims, &key).context("Failed to sign token")?;
        Ok(token)
    }

    async fn check_referral_code(&self, supplied: Option<&str>) -> DomainResult<()> {
        let supplied = supplied.map(str::trim).unwrap_or_default();
        if supplied.is_empty() {
            return Err(DomainError::validation("A referral code is required to register"));
        }

        let settings = self
            .settings_repository
            .get_settings(SETTINGS_KEY)
            .await?
            .unwrap_or_default();
        if settings.staff_referral_code != supplied {
            warn!("Registration with invalid referral code");
            return Err(DomainError::unauthorized("Invalid referral code"));
        }
        Ok(())
    }
}

pub(crate) fn validate_credentials(username: &str, password: &str) -> DomainResult<()> {
    if username.is_empty() || password.is_empty() {
        return Err(DomainError::validation("Username and password are required"));
    }
    Ok(())
}

/// bcrypt runs on the blocking pool
pub(crate) async fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")??;
    Ok(hash)
}

async fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task failed")??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::DbConnection;

    fn test_options() -> AuthOptions {
        AuthOptions {
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::days(30),
            bcrypt_cost: 4,
        }
    }

    async fn create_test_service() -> (AuthService<DbConnection>, Arc<DbConnection>) {
        let db = Arc::new(DbConnection::in_memory().await.unwrap());
        (AuthService::new(db.clone(), test_options()), db)
    }

    fn register(username: &str, referral_code: Option<&str>) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            password: "s3cret!".to_string(),
            referral_code: referral_code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_first_user_becomes_admin_and_seeds_settings() {
        let (service, db) = create_test_service().await;

        let session = service.register(register("Owner", None)).await.unwrap();

        assert_eq!(session.user.role, UserRole::Admin);
        assert_eq!(session.user.username, "owner");
        let settings = db.create_settings_repository().get_settings(SETTINGS_KEY).await.unwrap().unwrap();
        assert_eq!(settings.staff_referral_code, INITIAL_REFERRAL_CODE);
    }

    #[tokio::test]
    async fn test_second_user_needs_referral_code() {
        let (service, _db) = create_test_service().await;
        service.register(register("owner", None)).await.unwrap();

        let missing = service.register(register("tech", None)).await;
        assert!(matches!(missing, Err(DomainError::Validation(_))));

        let wrong = service.register(register("tech", Some("nope"))).await;
        assert!(matches!(wrong, Err(DomainError::Unauthorized(_))));

        let ok = service.register(register("tech", Some(INITIAL_REFERRAL_CODE))).await.unwrap();
        assert_eq!(ok.user.role, UserRole::Staff);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let (service, _db) = create_test_service().await;
        service.register(register("owner", None)).await.unwrap();

        let result = service.register(register(" OWNER ", Some(INITIAL_REFERRAL_CODE))).await;
        assert!(matches!(result, Err(DomainError::Conflict(msg)) if msg == "Username is already taken"));
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let (service, _db) = create_test_service().await;
        let registered = service.register(register("owner", None)).await.unwrap();

        let session = service
            .login(LoginCommand { username: "Owner".to_string(), password: "s3cret!".to_string() })
            .await
            .unwrap();
        let user = service.authenticate(&session.token).await.unwrap();

        assert_eq!(user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let (service, _db) = create_test_service().await;
        service.register(register("owner", None)).await.unwrap();

        let result = service
            .login(LoginCommand { username: "owner".to_string(), password: "wrong".to_string() })
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized(msg)) if msg == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage_and_foreign_tokens() {
        let (service, _db) = create_test_service().await;
        let session = service.register(register("owner", None)).await.unwrap();

        assert!(matches!(service.authenticate("not-a-jwt").await, Err(DomainError::Unauthorized(_))));

        let mut other_options = test_options();
        other_options.jwt_secret = "another-secret".to_string();
        let (other, _other_db) = {
            let db = Arc::new(DbConnection::in_memory().await.unwrap());
            (AuthService::new(db.clone(), other_options), db)
        };
        let foreign = other.issue_token(&session.user).unwrap();
        assert!(matches!(service.authenticate(&foreign).await, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (service, _db) = create_test_service().await;
        let session = service.register(register("owner", None)).await.unwrap();

        let mut expired_options = test_options();
        expired_options.token_ttl = Duration::days(-1);
        let expired_service: AuthService<DbConnection> =
            AuthService::new(Arc::new(DbConnection::in_memory().await.unwrap()), expired_options);
        let token = expired_service.issue_token(&session.user).unwrap();

        assert!(matches!(service.authenticate(&token).await, Err(DomainError::Unauthorized(_))));
    }
}
