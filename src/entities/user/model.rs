use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::core::auth::UserType;
use crate::core::extractors::SessionUser;
use crate::core::ids::UserId;
use crate::core::validation::validators::{validate_not_blank, validate_phone, validate_tin};

/// A marketplace account
///
/// The password hash never leaves the process: it is skipped on
/// serialization and redacted from `Debug`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub business_name: Option<String>,
    pub tin: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
    pub is_vat_registered: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name printed on receipts: the business name when there is one.
    pub fn display_name(&self) -> &str {
        self.business_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            user_type: self.user_type,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("user_type", &self.user_type)
            .field("business_name", &self.business_name)
            .field("tin", &self.tin)
            .finish_non_exhaustive()
    }
}

/// Insert payload for the user table
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub business_name: Option<String>,
    pub tin: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
    pub is_vat_registered: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub business_name: Option<String>,
    #[validate(custom(function = "validate_tin"))]
    pub tin: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
    #[serde(default)]
    pub is_vat_registered: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: UserId::new(1),
            username: "abebe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            email: "abebe@example.com".to_string(),
            name: "Abebe Kebede".to_string(),
            phone: "+251911000000".to_string(),
            business_name: Some("Abebe Cafe".to_string()),
            tin: Some("0012345678".to_string()),
            address: None,
            user_type: UserType::Business,
            is_vat_registered: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_never_exposed() {
        let user = sample();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["businessName"], "Abebe Cafe");
        assert_eq!(json["userType"], "business");
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn test_display_name_prefers_business() {
        let mut user = sample();
        assert_eq!(user.display_name(), "Abebe Cafe");
        user.business_name = Some("  ".to_string());
        assert_eq!(user.display_name(), "Abebe Kebede");
    }

    #[test]
    fn test_register_request_rules() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "ab",
            "password": "123",
            "email": "not-an-email",
            "name": "Abebe",
            "phone": "+251911000000",
            "tin": "42",
            "userType": "business"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("tin"));
        assert!(!fields.contains_key("phone"));
    }
}
