use crate::application_port::*;
use crate::domain_model::*;

/// External credential authority. Hashing and credential storage live behind
/// this port; the auth core never sees a password hash.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` means the credentials did not match. Callers must not learn
    /// whether the username or the password was wrong.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, AuthError>;

    /// Fails with `AuthError::DuplicateUsername` if the name is taken.
    async fn create_account(&self, username: &str, password: &str)
    -> Result<Identity, AuthError>;
}
