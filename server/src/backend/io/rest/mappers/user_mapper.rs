use crate::backend::domain::models::settings::Settings as DomainSettings;
use crate::backend::domain::models::user::{User as DomainUser, UserRole as DomainUserRole};
use crate::backend::domain::AuthSession;
use shared::{AuthResponse, Settings as SharedSettings, User as SharedUser, UserRole as SharedUserRole};

pub struct UserMapper;

impl UserMapper {
    /// Password hashes never leave the server
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            username: domain.username,
            role: Self::to_dto_role(domain.role),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_auth_response(session: AuthSession) -> AuthResponse {
        AuthResponse {
            id: session.user.id,
            username: session.user.username,
            role: Self::to_dto_role(session.user.role),
            token: session.token,
        }
    }

    pub fn settings_to_dto(domain: DomainSettings) -> SharedSettings {
        SharedSettings {
            key: domain.key,
            staff_referral_code: domain.staff_referral_code,
        }
    }

    fn to_dto_role(domain_role: DomainUserRole) -> SharedUserRole {
        match domain_role {
            DomainUserRole::Admin => SharedUserRole::Admin,
            DomainUserRole::Staff => SharedUserRole::Staff,
        }
    }
}
