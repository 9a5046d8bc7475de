//! Axum extractors for the session user and path ids

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tower_sessions::Session;

use crate::core::auth::{AuthContext, UserType};
use crate::core::error::{MarketError, MarketResult, RequestError};
use crate::core::ids::UserId;

/// Session keys
pub mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}

/// What the session remembers about a logged-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub user_type: UserType,
}

impl SessionUser {
    pub fn context(&self) -> AuthContext {
        AuthContext::user(self.id, self.user_type)
    }
}

async fn session_user(parts: &Parts) -> MarketResult<Option<SessionUser>> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };
    Ok(session
        .get::<SessionUser>(session_keys::CURRENT_USER)
        .await?)
}

/// Extractor that requires a logged-in user, rejecting with 401 otherwise.
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("hello user {}", user.id)
/// }
/// ```
pub struct RequireUser(pub SessionUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await?
            .map(Self)
            .ok_or_else(|| {
                MarketError::Request(RequestError::Unauthorized {
                    message: "not logged in".to_string(),
                })
            })
    }
}

/// Store the user in the session after a fresh session id is issued.
pub async fn set_session_user(session: &Session, user: SessionUser) -> MarketResult<()> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    Ok(())
}

/// Drop the session entirely (logout).
pub async fn clear_session(session: &Session) -> MarketResult<()> {
    session.flush().await?;
    Ok(())
}

/// Parse a path segment into a typed id, 400 when it is not an integer.
pub fn parse_id<T: FromStr>(raw: &str) -> MarketResult<T> {
    raw.parse::<T>().map_err(|_| {
        MarketError::Request(RequestError::InvalidEntityId {
            id: raw.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::OrderId;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_parse_id() {
        let id: OrderId = parse_id("17").unwrap();
        assert_eq!(id, OrderId::new(17));

        let err = parse_id::<OrderId>("seventeen").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_require_user_without_session_layer_is_401() {
        let (mut parts, _) = Request::builder().uri("/api/user").body(()).unwrap().into_parts();
        let err = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_session_user_serde() {
        let user = SessionUser {
            id: UserId::new(4),
            user_type: UserType::Vansales,
        };
        let json = serde_json::to_value(user).unwrap();
        assert_eq!(json, serde_json::json!({"id": 4, "user_type": "vansales"}));
    }
}
