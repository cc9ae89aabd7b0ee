use crate::domain_model::{SessionId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claim set embedded in every signed token. Field names are part of the wire
/// contract: `user_id`, `session_id`, `exp`, `type`.
///
/// `session_id` is optional on the decode side only, so a signed token missing
/// the claim can be detected and rejected with its own error instead of a
/// generic decode failure. Every token minted here carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub session_id: Option<SessionId>,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenClaims {
    pub fn new(kind: TokenKind, user_id: UserId, session_id: SessionId, exp: i64) -> Self {
        Self {
            user_id,
            session_id: Some(session_id),
            exp,
            kind,
        }
    }
}
