use serde::Serialize;

/// Auth failure taxonomy. The display strings of the credential/token/session
/// variants are the exact `error` strings clients see; the `Store`/`Cache`/
/// `Internal` variants carry backend detail that must never reach the wire.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Refresh token has expired.")]
    RefreshTokenExpired,
    #[error("Invalid refresh token.")]
    RefreshTokenInvalid,
    #[error("Session has been revoked.")]
    SessionRevoked,
    #[error("Session does not exist.")]
    SessionNotFound,
    #[error("Authorization header missing.")]
    MissingAuthHeader,
    #[error("No token provided.")]
    NoTokenProvided,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Session ID not found in token.")]
    SessionIdMissing,
    #[error("A user with that username already exists.")]
    DuplicateUsername,
    #[error("store error: {0}")]
    Store(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

/// Outcome of the cache-membership check. Always a payload, never an error:
/// validation failures are data to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TokenValidation {
    pub is_valid: bool,
    pub message: String,
}

/// Pulls the credential out of an `Authorization: Bearer <token>` value.
/// Absent or blank header, bearer with no credential, and a non-bearer
/// scheme are three different failures.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingAuthHeader)?;
    if header.trim().is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) => Ok(token),
        (Some("Bearer"), None) => Err(AuthError::NoTokenProvided),
        _ => Err(AuthError::InvalidToken),
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Credential check via the identity provider, then a fresh session and a
    /// new access/refresh pair. Any credential mismatch is the one generic
    /// `InvalidCredentials`.
    async fn login(&self, input: LoginInput) -> Result<TokenPair, AuthError>;

    /// Allowlist membership only. Infallible by contract; backend failures
    /// are absorbed into `is_valid: false`.
    async fn validate_token(&self, token: &str) -> TokenValidation;

    /// Mint a new access token against a live session. The refresh token
    /// comes back unchanged; there is no rotation.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke the session named by the access token in the Authorization
    /// header and drop the token from the allowlist.
    async fn logout(&self, authorization: Option<&str>) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_splits_scheme_and_credential() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_blank_header_is_its_own_failure() {
        assert!(matches!(bearer_token(None), Err(AuthError::MissingAuthHeader)));
        assert!(matches!(bearer_token(Some("")), Err(AuthError::MissingAuthHeader)));
        assert!(matches!(bearer_token(Some("   ")), Err(AuthError::MissingAuthHeader)));
    }

    #[test]
    fn bearer_without_credential_means_no_token() {
        assert!(matches!(bearer_token(Some("Bearer")), Err(AuthError::NoTokenProvided)));
        assert!(matches!(bearer_token(Some("Bearer ")), Err(AuthError::NoTokenProvided)));
    }

    #[test]
    fn non_bearer_scheme_is_an_invalid_token() {
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(AuthError::InvalidToken)
        ));
    }
}
