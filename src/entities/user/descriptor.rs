use super::handlers::{current_user, login, logout, register};
use super::service::AccountService;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

pub struct UserDescriptor {
    pub accounts: AccountService,
}

impl UserDescriptor {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts }
    }
}

impl EntityDescriptor for UserDescriptor {
    fn entity_type(&self) -> &str {
        "user"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/logout", post(logout))
            .route("/api/user", get(current_user))
            .with_state(self.accounts.clone())
    }
}
