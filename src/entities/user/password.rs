//! Argon2id password hashing

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::core::error::{MarketError, MarketResult};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash,

    #[error("password does not match")]
    Mismatch,
}

impl From<PasswordError> for MarketError {
    fn from(err: PasswordError) -> Self {
        MarketError::Internal(err.to_string())
    }
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored PHC string. A malformed hash is a
/// mismatch, never a panic.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// [`hash_password`] on the blocking pool; argon2 is too slow for a
/// runtime worker thread.
pub async fn hash_password_blocking(password: String) -> MarketResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {}", e))??;
    Ok(hash)
}

/// [`verify_password`] on the blocking pool; `Ok(false)` on mismatch.
pub async fn verify_password_blocking(password: String, hash: String) -> MarketResult<bool> {
    let outcome = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))?;
    match outcome {
        Ok(()) => Ok(true),
        Err(PasswordError::Mismatch) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
