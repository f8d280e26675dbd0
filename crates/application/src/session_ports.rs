use async_trait::async_trait;

use smart_sprint_core::{AppResult, CredentialClaims};
use smart_sprint_domain::Identity;

/// Durable storage for the single session credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads the stored credential. A malformed credential is an error.
    async fn load(&self) -> AppResult<Option<CredentialClaims>>;

    /// Replaces the stored credential.
    async fn save(&self, claims: &CredentialClaims) -> AppResult<()>;

    /// Removes the stored credential. Succeeds when nothing is stored.
    async fn clear(&self) -> AppResult<()>;
}

/// Accounts usable without the backend.
pub trait LocalAccountDirectory: Send + Sync {
    /// Verifies an email and password pair.
    ///
    /// Fails with [`smart_sprint_core::AppError::Unauthorized`] carrying
    /// "User not found" or "Invalid password".
    fn authenticate(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// Looks up an account by credential subject.
    fn find_by_subject(&self, subject: &str) -> Option<Identity>;
}
