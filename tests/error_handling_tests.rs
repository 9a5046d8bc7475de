//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses carry a stable code and useful details
//! - Conversions from library errors land in the right category

use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal_macros::dec;
use stockist_hub::core::error::{
    EntityError, OrderError, RequestError, StorageError, ValidationError,
};
use stockist_hub::prelude::*;
use validator::Validate;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_errors() {
        assert_eq!(
            MarketError::not_found("order", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        let err = MarketError::Entity(EntityError::AlreadyExists {
            entity_type: "user".to_string(),
            key: "cafe".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = MarketError::Entity(EntityError::NumberTaken {
            entity_type: "receipt".to_string(),
            number: "VAT-AAAAAAAA".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "NUMBER_TAKEN");
    }

    #[test]
    fn test_request_errors() {
        let cases = [
            (
                RequestError::InvalidEntityId { id: "x".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (
                RequestError::Unauthorized {
                    message: "login required".to_string(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (RequestError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                RequestError::Forbidden {
                    message: "no".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(MarketError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_order_errors() {
        let transition = OrderError::InvalidTransition {
            from: OrderStatus::Placed,
            to: OrderStatus::Delivered,
        };
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            OrderError::CompletionRequiresReceipt.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            OrderError::NotDelivered {
                status: OrderStatus::Matched
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        let mismatch = OrderError::TotalsMismatch {
            field: "total".to_string(),
            submitted: dec!(10),
            computed: dec!(659.5),
        };
        assert_eq!(mismatch.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_and_internal_errors_are_500() {
        let err = MarketError::Storage(StorageError::LockPoisoned {
            message: "poisoned".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            MarketError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_tests {
    use super::*;

    async fn body_of(err: MarketError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(MarketError::not_found("order", 42)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
        assert_eq!(body["details"]["entityType"], "order");
        assert_eq!(body["details"]["id"], "42");
    }

    #[tokio::test]
    async fn test_invalid_field_body() {
        let (status, body) = body_of(MarketError::invalid_field("sellerTin", "missing")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "sellerTin");
        assert_eq!(body["details"]["fields"][0]["message"], "missing");
    }

    #[tokio::test]
    async fn test_transition_body_lists_allowed_moves() {
        let err: MarketError = OrderError::InvalidTransition {
            from: OrderStatus::Matched,
            to: OrderStatus::Placed,
        }
        .into();
        let (_, body) = body_of(err).await;
        assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");
        assert_eq!(body["details"]["from"], "matched");
        assert_eq!(body["details"]["to"], "placed");
        assert_eq!(
            body["details"]["allowed"],
            serde_json::json!(["accepted", "delivering"])
        );
    }

    #[tokio::test]
    async fn test_totals_mismatch_body() {
        let err: MarketError = OrderError::TotalsMismatch {
            field: "vatAmount".to_string(),
            submitted: dec!(80),
            computed: dec!(79.5),
        }
        .into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "TOTALS_MISMATCH");
        assert_eq!(body["details"]["field"], "vatAmount");
        assert!(body["message"].as_str().unwrap().contains("79.5"));
    }

    #[tokio::test]
    async fn test_details_omitted_when_empty() {
        let (status, body) = body_of(RequestError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
        assert!(body.get("details").is_none());
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "too short"))]
        username: String,
        #[validate(range(min = 1, message = "must be positive"))]
        quantity: i64,
    }

    #[test]
    fn test_validator_errors_become_sorted_field_errors() {
        let probe = Probe {
            username: "ab".to_string(),
            quantity: 0,
        };
        let err: MarketError = probe.validate().unwrap_err().into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        match err {
            MarketError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["quantity", "username"]);
                assert_eq!(fields[1].message, "too short");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_anyhow_becomes_internal() {
        let err: MarketError = anyhow::anyhow!("hashing failed").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("hashing failed"));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse(raw: &str) -> Result<i64, RequestError> {
            raw.parse().map_err(|_| RequestError::InvalidEntityId {
                id: raw.to_string(),
            })
        }

        fn load(raw: &str) -> MarketResult<()> {
            let id = parse(raw)?;
            Err(EntityError::NotFound {
                entity_type: "beverage".to_string(),
                id: id.to_string(),
            }
            .into())
        }

        assert_eq!(load("abc").unwrap_err().error_code(), "INVALID_ID");
        assert_eq!(load("5").unwrap_err().error_code(), "ENTITY_NOT_FOUND");
    }
}

// =============================================================================
// Over HTTP
// =============================================================================

mod http_tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let app = ServerBuilder::new().build().await.unwrap();
        let server = TestServer::new(app);

        let response = server
            .post("/api/login")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unauthenticated_body() {
        let app = ServerBuilder::new().build().await.unwrap();
        let server = TestServer::new(app);

        let response = server.get("/api/orders/customer").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");

        let response = server
            .post("/api/login")
            .json(&json!({"username": "ghost", "password": "whatever"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["code"], "INVALID_CREDENTIALS");
    }
}
