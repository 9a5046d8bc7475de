//! Authorization for marketplace routes
//!
//! The session identifies the caller; an [`AuthContext`] describes it and an
//! [`AuthPolicy`] decides whether it may perform an operation. Resource-level
//! rules (is this caller a participant of that order?) live next to the
//! resource, policies only look at the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::{MarketError, MarketResult};
use crate::core::ids::UserId;

/// Role tag of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Business customer placing orders
    Business,
    /// Local retailer fulfilling orders
    Stockist,
    /// Van sales agent replenishing stockists
    Vansales,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Business => "business",
            UserType::Stockist => "stockist",
            UserType::Vansales => "vansales",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(UserType::Business),
            "stockist" => Ok(UserType::Stockist),
            "vansales" => Ok(UserType::Vansales),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// Who is making the request
///
/// Only built from a session user; routes without a session never reach a
/// policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub user_type: UserType,
}

impl AuthContext {
    pub fn user(user_id: UserId, user_type: UserType) -> Self {
        Self { user_id, user_type }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Caller must have one of these user types
    HasRole(Vec<UserType>),

    AdminOnly,

    /// At least one policy must pass
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Shorthand for `HasRole` with admin always included
    pub fn role_or_admin(roles: &[UserType]) -> Self {
        AuthPolicy::Or(vec![AuthPolicy::HasRole(roles.to_vec()), AuthPolicy::AdminOnly])
    }

    /// Check if the context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::HasRole(roles) => roles.contains(&context.user_type),

            AuthPolicy::AdminOnly => context.is_admin(),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Like [`check`](Self::check) but as a 403 error.
    pub fn enforce(&self, context: &AuthContext, operation: &str) -> MarketResult<()> {
        if self.check(context) {
            return Ok(());
        }
        Err(MarketError::forbidden(format!(
            "{} users cannot {}",
            context.user_type, operation
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn stockist() -> AuthContext {
        AuthContext::user(UserId::new(2), UserType::Stockist)
    }

    #[test]
    fn test_policy_check() {
        let ctx = stockist();
        assert!(AuthPolicy::HasRole(vec![UserType::Stockist]).check(&ctx));
        assert!(!AuthPolicy::HasRole(vec![UserType::Business]).check(&ctx));
        assert!(!AuthPolicy::AdminOnly.check(&ctx));
    }

    #[test]
    fn test_role_or_admin() {
        let policy = AuthPolicy::role_or_admin(&[UserType::Stockist, UserType::Vansales]);
        assert!(policy.check(&stockist()));
        assert!(policy.check(&AuthContext::user(UserId::new(9), UserType::Admin)));
        assert!(!policy.check(&AuthContext::user(UserId::new(1), UserType::Business)));
    }

    #[test]
    fn test_enforce_is_forbidden() {
        let policy = AuthPolicy::HasRole(vec![UserType::Business]);
        assert!(policy
            .enforce(&AuthContext::user(UserId::new(1), UserType::Business), "place orders")
            .is_ok());

        let err = policy.enforce(&stockist(), "place orders").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("stockist users cannot place orders"));
    }

    #[test]
    fn test_user_type_parse_and_serde() {
        assert_eq!("VanSales".parse::<UserType>(), Ok(UserType::Vansales));
        assert!("driver".parse::<UserType>().is_err());
        assert_eq!(
            serde_json::to_value(UserType::Business).unwrap(),
            serde_json::json!("business")
        );
    }
}
