//! Credential verification.
//!
//! Pure read path: given a username and password, resolve to an
//! authenticated user snapshot or a typed failure. Session creation is a
//! separate, explicit step taken by the login handler only after this
//! returns success.

use super::models::AuthenticatedUser;
use super::repository::{RepositoryError, RepositoryPtr};
use thiserror::Error;

/// bcrypt work factor used for stored password hashes.
const HASH_COST: u32 = 12;

/// Typed authentication failures.
///
/// Callers must not surface the `UserNotFound` / `InvalidPassword`
/// distinction to the browser; both map to the same generic message so
/// failure responses do not reveal whether a username exists.
#[derive(Debug, Error)]
pub enum AuthError {
    // ---
    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    InvalidPassword,

    #[error("hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl AuthError {
    /// The single user-visible message for credential failures.
    ///
    /// Store and hashing failures get a distinct "try again" message; they
    /// say nothing about the credentials themselves.
    pub fn user_message(&self) -> &'static str {
        // ---
        match self {
            AuthError::UserNotFound | AuthError::InvalidPassword => "Invalid username or password",
            AuthError::Hash(_) | AuthError::Store(_) => {
                "Authentication is temporarily unavailable. Please try again."
            }
        }
    }
}

/// Verifies a username/password pair against the credential store.
///
/// Lookup is by exact username match. The supplied password is checked
/// with bcrypt's verification primitive, never by comparing hash strings.
/// On success returns the normalized user snapshot; no session is created
/// here.
pub async fn verify_credentials(
    repo: &RepositoryPtr,
    username: &str,
    password: &str,
) -> Result<AuthenticatedUser, AuthError> {
    // ---
    let record = repo
        .find_credential_by_username(username)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let verified = verify_password(password.to_string(), record.password_hash.clone()).await?;
    if !verified {
        return Err(AuthError::InvalidPassword);
    }

    Ok(AuthenticatedUser::from_record(&record))
}

/// Hashes a plaintext password for storage.
///
/// bcrypt is CPU-bound, so the work runs on the blocking pool rather than
/// stalling the request executor.
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    // ---
    tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .map_err(|e| AuthError::Hash(bcrypt::BcryptError::InvalidHash(e.to_string())))?
        .map_err(AuthError::Hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    // ---
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hash(bcrypt::BcryptError::InvalidHash(e.to_string())))?
        .map_err(AuthError::Hash)
}
