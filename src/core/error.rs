//! Typed error handling for the marketplace
//!
//! Every operation returns a [`MarketResult`], so handlers can propagate with
//! `?` and the error renders itself as an HTTP response.
//!
//! # Error Categories
//!
//! - [`EntityError`]: missing or duplicate records
//! - [`ValidationError`]: malformed or inconsistent input
//! - [`RequestError`]: authentication, authorization and path problems
//! - [`OrderError`]: order lifecycle violations
//! - [`StorageError`]: store and session backend failures
//!
//! Every variant maps to a status code and a stable machine-readable code:
//!
//! ```rust,ignore
//! match workflow.update_status(&actor, order_id, update).await {
//!     Err(MarketError::Order(OrderError::InvalidTransition { from, to })) => {
//!         println!("cannot move {} to {}", from, to);
//!     }
//!     other => { /* ... */ }
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::core::status::OrderStatus;

/// The main error type of the marketplace
#[derive(Debug)]
pub enum MarketError {
    /// Missing or duplicate records
    Entity(EntityError),

    /// Invalid input
    Validation(ValidationError),

    /// Authentication, authorization and request shape errors
    Request(RequestError),

    /// Order lifecycle errors
    Order(OrderError),

    /// Storage and session backend errors
    Storage(StorageError),

    /// Errors that should not happen in normal operation
    Internal(String),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Entity(e) => write!(f, "{}", e),
            MarketError::Validation(e) => write!(f, "{}", e),
            MarketError::Request(e) => write!(f, "{}", e),
            MarketError::Order(e) => write!(f, "{}", e),
            MarketError::Storage(e) => write!(f, "{}", e),
            MarketError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketError::Entity(e) => Some(e),
            MarketError::Validation(e) => Some(e),
            MarketError::Request(e) => Some(e),
            MarketError::Order(e) => Some(e),
            MarketError::Storage(e) => Some(e),
            MarketError::Internal(_) => None,
        }
    }
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl MarketError {
    /// Shorthand for a missing record
    pub fn not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        MarketError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Shorthand for a 403
    pub fn forbidden(message: impl Into<String>) -> Self {
        MarketError::Request(RequestError::Forbidden {
            message: message.into(),
        })
    }

    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        MarketError::Validation(ValidationError::FieldError {
            field: field.to_string(),
            message: message.into(),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Entity(e) => e.status_code(),
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::Request(e) => e.status_code(),
            MarketError::Order(e) => e.status_code(),
            MarketError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketError::Entity(e) => e.error_code(),
            MarketError::Validation(_) => "VALIDATION_ERROR",
            MarketError::Request(e) => e.error_code(),
            MarketError::Order(e) => e.error_code(),
            MarketError::Storage(_) => "STORAGE_ERROR",
            MarketError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            MarketError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entityType": entity_type,
                    "id": id
                }))
            }
            MarketError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            MarketError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({
                    "fields": [{ "field": field, "message": message }]
                }))
            }
            MarketError::Order(OrderError::InvalidTransition { from, to }) => {
                Some(serde_json::json!({
                    "from": from,
                    "to": to,
                    "allowed": from.allowed_next()
                }))
            }
            MarketError::Order(OrderError::TotalsMismatch {
                field,
                submitted,
                computed,
            }) => Some(serde_json::json!({
                "field": field,
                "submitted": submitted,
                "computed": computed
            })),
            _ => None,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "request failed: {}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to records in the store
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound { entity_type: String, id: String },

    /// A unique key is already taken
    AlreadyExists { entity_type: String, key: String },

    /// A freshly generated document number collided with a stored one
    NumberTaken { entity_type: String, number: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::AlreadyExists { entity_type, key } => {
                write!(f, "{} '{}' already exists", entity_type, key)
            }
            EntityError::NumberTaken {
                entity_type,
                number,
            } => write!(f, "{} number '{}' is already taken", entity_type, number),
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::NumberTaken { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::NumberTaken { .. } => "NUMBER_TAKEN",
        }
    }
}

impl From<EntityError> for MarketError {
    fn from(err: EntityError) -> Self {
        MarketError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Body could not be parsed
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for MarketError {
    fn from(err: ValidationError) -> Self {
        MarketError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for MarketError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MarketError::Validation(errors.into())
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the HTTP request and its caller
#[derive(Debug)]
pub enum RequestError {
    /// Path id is not an integer
    InvalidEntityId { id: String },

    /// No session user
    Unauthorized { message: String },

    /// Unknown username or wrong password
    InvalidCredentials,

    /// Authenticated but not allowed
    Forbidden { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidEntityId { id } => {
                write!(f, "Invalid entity ID format: '{}'", id)
            }
            RequestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RequestError::InvalidCredentials => write!(f, "Invalid username or password"),
            RequestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ID",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::InvalidCredentials => "INVALID_CREDENTIALS",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl From<RequestError> for MarketError {
    fn from(err: RequestError) -> Self {
        MarketError::Request(err)
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Order lifecycle violations
#[derive(Debug)]
pub enum OrderError {
    /// The state machine does not allow this move
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Another writer changed the status first
    StatusConflict {
        order_id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// Completion only happens through receipt issuance
    CompletionRequiresReceipt,

    /// Receipts can only be issued for delivered orders
    NotDelivered { status: OrderStatus },

    /// Submitted money does not match the server-side computation
    TotalsMismatch {
        field: String,
        submitted: Decimal,
        computed: Decimal,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::InvalidTransition { from, to } => {
                write!(f, "Cannot change order status from '{}' to '{}'", from, to)
            }
            OrderError::StatusConflict {
                order_id,
                expected,
                actual,
            } => write!(
                f,
                "Order {} changed concurrently: expected '{}', found '{}'",
                order_id, expected, actual
            ),
            OrderError::CompletionRequiresReceipt => {
                write!(f, "Orders are completed by issuing a VAT receipt")
            }
            OrderError::NotDelivered { status } => write!(
                f,
                "A VAT receipt requires a delivered order, order is '{}'",
                status
            ),
            OrderError::TotalsMismatch {
                field,
                submitted,
                computed,
            } => write!(
                f,
                "Submitted {} {} does not match computed {}",
                field, submitted, computed
            ),
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::InvalidTransition { .. } => StatusCode::CONFLICT,
            OrderError::StatusConflict { .. } => StatusCode::CONFLICT,
            OrderError::CompletionRequiresReceipt => StatusCode::CONFLICT,
            OrderError::NotDelivered { .. } => StatusCode::CONFLICT,
            OrderError::TotalsMismatch { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            OrderError::StatusConflict { .. } => "STATUS_CONFLICT",
            OrderError::CompletionRequiresReceipt => "COMPLETION_REQUIRES_RECEIPT",
            OrderError::NotDelivered { .. } => "ORDER_NOT_DELIVERED",
            OrderError::TotalsMismatch { .. } => "TOTALS_MISMATCH",
        }
    }
}

impl From<OrderError> for MarketError {
    fn from(err: OrderError) -> Self {
        MarketError::Order(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from the store or the session backend
#[derive(Debug)]
pub enum StorageError {
    /// Session read/write failed
    Session { message: String },

    /// Stored data violates an invariant
    IntegrityError { message: String },

    /// A table lock was poisoned by a panicking writer
    LockPoisoned { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Session { message } => write!(f, "Session error: {}", message),
            StorageError::IntegrityError { message } => {
                write!(f, "Data integrity error: {}", message)
            }
            StorageError::LockPoisoned { message } => {
                write!(f, "Failed to acquire lock: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for MarketError {
    fn from(err: StorageError) -> Self {
        MarketError::Storage(err)
    }
}

impl From<tower_sessions::session::Error> for MarketError {
    fn from(err: tower_sessions::session::Error) -> Self {
        MarketError::Storage(StorageError::Session {
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for MarketError {
    fn from(err: anyhow::Error) -> Self {
        MarketError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entity_error_display() {
        let err = EntityError::NotFound {
            entity_type: "order".to_string(),
            id: "9".to_string(),
        };
        assert!(err.to_string().contains("order"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_entity_error_status_code() {
        let err = MarketError::not_found("beverage", 3);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = MarketError::Entity(EntityError::AlreadyExists {
            entity_type: "user".to_string(),
            key: "abebe".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_request_error_status_codes() {
        assert_eq!(
            MarketError::from(RequestError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            MarketError::forbidden("not a participant").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            MarketError::from(RequestError::InvalidEntityId {
                id: "abc".to_string()
            })
            .error_code(),
            "INVALID_ID"
        );
    }

    #[test]
    fn test_order_errors_are_conflicts() {
        let err = MarketError::from(OrderError::InvalidTransition {
            from: OrderStatus::Placed,
            to: OrderStatus::Completed,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "INVALID_STATUS_TRANSITION");

        let details = err.to_response().details.unwrap();
        assert_eq!(details["from"], "placed");
        assert_eq!(details["allowed"], serde_json::json!(["matched"]));
    }

    #[test]
    fn test_totals_mismatch_is_bad_request() {
        let err = MarketError::from(OrderError::TotalsMismatch {
            field: "total".to_string(),
            submitted: dec!(600),
            computed: dec!(659.5),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("659.5"));
    }

    #[test]
    fn test_validation_error_multiple_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "username".to_string(),
                message: "too short".to_string(),
            },
            FieldValidationError {
                field: "email".to_string(),
                message: "invalid format".to_string(),
            },
        ]);
        let display = err.to_string();
        assert!(display.contains("username"));
        assert!(display.contains("email"));
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = MarketError::from(StorageError::Session {
            message: "store unavailable".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_error_response_format() {
        let err = MarketError::not_found("receipt", 5);
        let response = err.to_response();
        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        assert!(response.message.contains("receipt"));
        assert_eq!(response.details.unwrap()["id"], "5");
    }
}
