use super::models::{CredentialRecord, NewUser};
use std::sync::Arc;
use thiserror::Error;

/// Which unique column a duplicate-entry violation landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
}

impl DuplicateField {
    /// Field-level message shown to the user on a unique-constraint hit.
    pub fn user_message(&self) -> &'static str {
        // ---
        match self {
            DuplicateField::Username => "This username is already taken",
            DuplicateField::Email => "This email address is already registered",
        }
    }
}

/// Failures surfaced by the credential store.
///
/// `Duplicate` is recoverable and carries a field-level message; `Timeout`
/// and `Database` are logged internally and surfaced to the user as a
/// generic "try again" message, never as raw database error text.
#[derive(Debug, Error)]
pub enum RepositoryError {
    // ---
    #[error("duplicate entry for {0:?}")]
    Duplicate(DuplicateField),

    #[error("timed out acquiring a database connection")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Abstraction over the relational store for credentials and profiles.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Fetch the credential record (joined with its profile) by exact username.
    async fn find_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, RepositoryError>;

    /// True if a credential row already uses this username.
    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError>;

    /// True if a profile row already uses this email.
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Create the profile row and its credential row as one atomic unit.
    ///
    /// A failure at any step rolls back both inserts. Returns the new
    /// profile id.
    async fn create_user(&self, new_user: NewUser) -> Result<i64, RepositoryError>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
