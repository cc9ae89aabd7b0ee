use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a fresh, non-revoked session for the user.
    async fn create(&self, user_id: UserId) -> Result<Session, AuthError>;

    /// Fails with `AuthError::SessionNotFound` if absent.
    async fn get(&self, id: SessionId) -> Result<Session, AuthError>;

    /// Set revoked=true and persist. Idempotent, and a no-op for unknown
    /// ids; revoked is terminal.
    async fn revoke(&self, id: SessionId) -> Result<(), AuthError>;
}
