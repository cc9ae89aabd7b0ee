use crate::application_port::*;

/// Allowlist of currently-valid access tokens. Absence of an entry is the
/// deny signal, so losing the backing store only ever locks tokens out.
#[async_trait::async_trait]
pub trait AccessTokenCache: Send + Sync {
    /// Mark a token valid for its remaining lifetime. Entries self-expire.
    async fn register(&self, token: &str, ttl_secs: u64) -> Result<(), AuthError>;

    /// Membership + marker check only. Never re-verifies signature or claims.
    async fn is_valid(&self, token: &str) -> Result<bool, AuthError>;

    /// Drop the entry immediately. Removing an absent entry is not an error.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;
}
