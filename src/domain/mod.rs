pub mod auth;
mod metrics;
mod models;
mod repository;
mod session;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Credential store abstractions
pub use repository::{DuplicateField, Repository, RepositoryError, RepositoryPtr};

// Session store abstractions
pub use session::{SessionRecord, SessionStore, SessionStoreError, SessionStorePtr};

// Core models
pub use models::{AuthenticatedUser, CredentialRecord, NewUser, Role};
