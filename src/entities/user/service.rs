use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::auth::UserType;
use crate::core::error::{EntityError, MarketError, MarketResult, RequestError};
use crate::core::events::{EventBus, MarketEvent};
use crate::core::ids::UserId;
use crate::core::service::MarketStore;
use crate::entities::user::model::{LoginRequest, NewUser, RegisterRequest, User};
use crate::entities::user::password::{hash_password_blocking, verify_password_blocking};

/// Registration and credential checks; sessions are handled by the caller
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn MarketStore>,
    events: EventBus,
}

impl AccountService {
    pub fn new(store: Arc<dyn MarketStore>, events: EventBus) -> Self {
        Self { store, events }
    }

    #[instrument(skip(self, request), fields(username = %request.username, user_type = %request.user_type))]
    pub async fn register(&self, request: RegisterRequest) -> MarketResult<User> {
        if request.user_type == UserType::Admin {
            return Err(MarketError::forbidden("admin accounts cannot self-register"));
        }
        let username = request.username.trim().to_string();
        if self.store.get_user_by_username(&username).await?.is_some() {
            return Err(EntityError::AlreadyExists {
                entity_type: "user".to_string(),
                key: username,
            }
            .into());
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = self
            .store
            .create_user(NewUser {
                username,
                password_hash,
                email: request.email.trim().to_string(),
                name: request.name.trim().to_string(),
                phone: request.phone.trim().to_string(),
                business_name: trimmed(request.business_name),
                tin: trimmed(request.tin),
                address: trimmed(request.address),
                user_type: request.user_type,
                is_vat_registered: request.is_vat_registered,
            })
            .await?;

        info!("Registered {} user '{}' (id {})", user.user_type, user.username, user.id);
        self.events.publish(MarketEvent::UserRegistered {
            user_id: user.id,
            user_type: user.user_type,
        });

        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail the same way.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> MarketResult<User> {
        let Some(user) = self.store.get_user_by_username(request.username.trim()).await? else {
            warn!("Login failed: unknown user");
            return Err(RequestError::InvalidCredentials.into());
        };

        if !verify_password_blocking(request.password, user.password_hash.clone()).await? {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(RequestError::InvalidCredentials.into());
        }

        info!("User '{}' logged in", user.username);
        Ok(user)
    }

    pub async fn get(&self, user: UserId) -> MarketResult<User> {
        self.store
            .get_user(user)
            .await?
            .ok_or_else(|| MarketError::not_found("user", user))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryMarketStore;
    use axum::http::StatusCode;

    fn service() -> AccountService {
        AccountService::new(Arc::new(InMemoryMarketStore::new()), EventBus::new(8))
    }

    fn registration(username: &str, user_type: UserType) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "secret123".to_string(),
            email: format!("{}@example.com", username),
            name: "Abebe".to_string(),
            phone: "+251911000000".to_string(),
            business_name: Some("  Abebe Cafe ".to_string()),
            tin: Some(String::new()),
            address: None,
            user_type,
            is_vat_registered: true,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let accounts = service();
        let user = accounts
            .register(registration("abebe", UserType::Business))
            .await
            .unwrap();
        assert_eq!(user.business_name.as_deref(), Some("Abebe Cafe"));
        assert_eq!(user.tin, None);
        assert!(user.password_hash.starts_with("$argon2"));

        let logged_in = accounts.login(login("abebe", "secret123")).await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let accounts = service();
        accounts
            .register(registration("abebe", UserType::Business))
            .await
            .unwrap();

        let err = accounts.login(login("abebe", "nope")).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIALS");
        let err = accounts.login(login("ghost", "secret123")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let accounts = service();
        accounts
            .register(registration("abebe", UserType::Business))
            .await
            .unwrap();
        let err = accounts
            .register(registration("ABEBE", UserType::Stockist))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_admin_cannot_self_register() {
        let err = service()
            .register(registration("boss", UserType::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
