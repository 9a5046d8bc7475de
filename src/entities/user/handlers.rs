//! Account HTTP handlers
//!
//! Login state lives in the `tower-sessions` session; handlers only move the
//! [`SessionUser`](crate::core::extractors::SessionUser) in and out of it.

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{Value, json};
use tower_sessions::Session;

use super::model::{LoginRequest, RegisterRequest, User};
use super::service::AccountService;
use crate::core::error::MarketResult;
use crate::core::extractors::{RequireUser, clear_session, set_session_user};
use crate::core::validation::ValidatedJson;

/// Create the account and log it in
pub async fn register(
    State(accounts): State<AccountService>,
    session: Session,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> MarketResult<(StatusCode, Json<User>)> {
    let user = accounts.register(request).await?;
    set_session_user(&session, user.session_user()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(accounts): State<AccountService>,
    session: Session,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> MarketResult<Json<User>> {
    let user = accounts.login(request).await?;
    set_session_user(&session, user.session_user()).await?;
    Ok(Json(user))
}

pub async fn logout(session: Session) -> MarketResult<Json<Value>> {
    clear_session(&session).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}

pub async fn current_user(
    State(accounts): State<AccountService>,
    RequireUser(user): RequireUser,
) -> MarketResult<Json<User>> {
    Ok(Json(accounts.get(user.id).await?))
}
