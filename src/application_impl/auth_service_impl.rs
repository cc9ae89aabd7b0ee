use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

const MSG_TOKEN_VALID: &str = "Token is valid.";
const MSG_TOKEN_EXPIRED: &str = "Token has expired.";
const MSG_TOKEN_MALFORMED: &str = "Invalid token.";
const MSG_TOKEN_NOT_IN_CACHE: &str = "Token is invalid or expired.";

/// Orchestrates the token/session lifecycle over the three leaf ports.
/// Tokens are self-contained signed artifacts; the cache and the session
/// store carry the revocable state the signatures cannot.
pub struct RealAuthService {
    identity_provider: Arc<dyn IdentityProvider>,
    session_store: Arc<dyn SessionStore>,
    token_cache: Arc<dyn AccessTokenCache>,
    token_codec: Arc<dyn TokenCodec>,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl RealAuthService {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        session_store: Arc<dyn SessionStore>,
        token_cache: Arc<dyn AccessTokenCache>,
        token_codec: Arc<dyn TokenCodec>,
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
    ) -> Self {
        Self {
            identity_provider,
            session_store,
            token_cache,
            token_codec,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    fn mint(
        &self,
        kind: TokenKind,
        user_id: UserId,
        session_id: SessionId,
        ttl_secs: u64,
    ) -> Result<String, AuthError> {
        let exp = Utc::now().timestamp() + ttl_secs as i64;
        self.token_codec
            .sign(&TokenClaims::new(kind, user_id, session_id, exp))
    }

    /// A cache miss still owes the caller a reason. The codec verdict picks
    /// between "expired", "malformed" and "well-formed but not on the
    /// allowlist" without changing the deny outcome.
    fn cache_miss_message(&self, token: &str) -> &'static str {
        match self.token_codec.verify(token) {
            TokenVerdict::Expired => MSG_TOKEN_EXPIRED,
            TokenVerdict::Invalid => MSG_TOKEN_MALFORMED,
            TokenVerdict::Valid(_) => MSG_TOKEN_NOT_IN_CACHE,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn login(&self, input: LoginInput) -> Result<TokenPair, AuthError> {
        let LoginInput { username, password } = input;

        let identity = self
            .identity_provider
            .authenticate(&username, &password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // always a fresh session; prior sessions for the user stay untouched
        let session = self.session_store.create(identity.id).await?;

        let access = self.mint(
            TokenKind::Access,
            identity.id,
            session.id,
            self.access_ttl_secs,
        )?;
        let refresh = self.mint(
            TokenKind::Refresh,
            identity.id,
            session.id,
            self.refresh_ttl_secs,
        )?;

        // refresh tokens are never cached; their validity is signature +
        // session state only
        self.token_cache
            .register(&access, self.access_ttl_secs)
            .await?;

        Ok(TokenPair {
            access: AccessToken(access),
            refresh: RefreshToken(refresh),
        })
    }

    async fn validate_token(&self, token: &str) -> TokenValidation {
        match self.token_cache.is_valid(token).await {
            Ok(true) => TokenValidation {
                is_valid: true,
                message: MSG_TOKEN_VALID.to_string(),
            },
            Ok(false) => TokenValidation {
                is_valid: false,
                message: self.cache_miss_message(token).to_string(),
            },
            Err(e) => {
                warn!("token cache unavailable during validation: {e}");
                TokenValidation {
                    is_valid: false,
                    message: MSG_TOKEN_NOT_IN_CACHE.to_string(),
                }
            }
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = match self.token_codec.verify(refresh_token) {
            TokenVerdict::Valid(claims) => claims,
            TokenVerdict::Expired => return Err(AuthError::RefreshTokenExpired),
            TokenVerdict::Invalid => return Err(AuthError::RefreshTokenInvalid),
        };
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::RefreshTokenInvalid);
        }
        let session_id = claims.session_id.ok_or(AuthError::RefreshTokenInvalid)?;

        let session = self.session_store.get(session_id).await?;
        if session.revoked {
            return Err(AuthError::SessionRevoked);
        }

        let access = self.mint(
            TokenKind::Access,
            claims.user_id,
            session_id,
            self.access_ttl_secs,
        )?;
        self.token_cache
            .register(&access, self.access_ttl_secs)
            .await?;

        // no rotation: the incoming refresh token goes back unchanged
        Ok(TokenPair {
            access: AccessToken(access),
            refresh: RefreshToken(refresh_token.to_string()),
        })
    }

    async fn logout(&self, authorization: Option<&str>) -> Result<(), AuthError> {
        let token = bearer_token(authorization)?;

        let claims = match self.token_codec.verify(token) {
            TokenVerdict::Valid(claims) => claims,
            TokenVerdict::Expired | TokenVerdict::Invalid => return Err(AuthError::InvalidToken),
        };

        let Some(session_id) = claims.session_id else {
            // the token is live in the allowlist; drop it before failing
            self.token_cache.revoke(token).await?;
            return Err(AuthError::SessionIdMissing);
        };

        let session = self.session_store.get(session_id).await?;
        self.session_store.revoke(session.id).await?;
        self.token_cache.revoke(token).await?;

        Ok(())
    }
}
