use crate::application_port::AuthError;
use crate::domain_model::TokenClaims;

/// Three-way verify outcome. Callers match instead of catching errors, and
/// the variants keep the check order honest: a token that fails the
/// structure/signature check is `Invalid` even if its `exp` is also past.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerdict {
    Valid(TokenClaims),
    Expired,
    Invalid,
}

/// Signs and verifies compact claim sets. Pure CPU work, so the trait is
/// synchronous even though every caller is async.
pub trait TokenCodec: Send + Sync {
    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> TokenVerdict;
}
