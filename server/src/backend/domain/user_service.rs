//! User management for admins.
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::info;

use crate::backend::domain::auth_service::{hash_password, validate_credentials};
use crate::backend::domain::commands::users::CreateStaffCommand;
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::user::{User, UserRole};
use crate::backend::storage::{Connection, UserStorage};

#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
    bcrypt_cost: u32,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>, bcrypt_cost: u32) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            bcrypt_cost,
        }
    }

    /// All users ordered by username
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.user_repository.list_users().await?)
    }

    pub async fn create_staff(&self, command: CreateStaffCommand) -> DomainResult<User> {
        let username = User::normalize_username(&command.username);
        validate_credentials(&username, &command.password)?;

        if self.user_repository.get_user_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }

        let now = Utc::now().trunc_subsecs(3);
        let user = User {
            id: User::generate_id(),
            username,
            password_hash: hash_password(&command.password, self.bcrypt_cost).await?,
            role: UserRole::Staff,
            created_at: now,
            updated_at: now,
        };
        self.user_repository.store_user(&user).await?;

        info!("Created staff user {}", user.username);
        Ok(user)
    }

    /// Delete `user_id` on behalf of `acting_user_id`
    pub async fn delete_user(&self, acting_user_id: &str, user_id: &str) -> DomainResult<()> {
        if acting_user_id == user_id {
            return Err(DomainError::validation("You cannot delete your own account"));
        }
        if !self.user_repository.delete_user(user_id).await? {
            return Err(DomainError::not_found("User not found"));
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::DbConnection;

    async fn create_test_service() -> UserService<DbConnection> {
        let db = Arc::new(DbConnection::in_memory().await.unwrap());
        UserService::new(db, 4)
    }

    fn staff(username: &str) -> CreateStaffCommand {
        CreateStaffCommand {
            username: username.to_string(),
            password: "counter-2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_staff() {
        let service = create_test_service().await;
        service.create_staff(staff("Vikram")).await.unwrap();
        service.create_staff(staff("anil")).await.unwrap();

        let users = service.list_users().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();

        assert_eq!(names, vec!["anil", "vikram"]);
        assert!(users.iter().all(|u| u.role == UserRole::Staff));
        assert!(users.iter().all(|u| u.password_hash.starts_with("$2")));
    }

    #[tokio::test]
    async fn test_create_staff_duplicate_and_blank() {
        let service = create_test_service().await;
        service.create_staff(staff("anil")).await.unwrap();

        assert!(matches!(service.create_staff(staff("Anil")).await, Err(DomainError::Conflict(_))));
        assert!(matches!(service.create_staff(staff("   ")).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = create_test_service().await;
        let user = service.create_staff(staff("anil")).await.unwrap();

        assert!(matches!(service.delete_user(&user.id, &user.id).await, Err(DomainError::Validation(_))));
        service.delete_user("admin-id", &user.id).await.unwrap();
        assert!(matches!(service.delete_user("admin-id", &user.id).await, Err(DomainError::NotFound(_))));
    }
}
