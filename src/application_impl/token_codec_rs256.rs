use crate::application_port::{AuthError, TokenCodec, TokenVerdict};
use crate::domain_model::TokenClaims;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// RS256 codec over a PEM keypair. Signing needs the private key, verifying
/// only the public one; both sides carry zero expiry leeway so a token is
/// expired the second its `exp` passes.
pub struct JwtRs256Codec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtRs256Codec {
    pub fn new(private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| AuthError::Internal(format!("private key pem: {e}")))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| AuthError::Internal(format!("public key pem: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
        })
    }
}

impl TokenCodec for JwtRs256Codec {
    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn verify(&self, token: &str) -> TokenVerdict {
        // decode checks the signature before any claim, so ExpiredSignature
        // can only mean "well-formed, correctly signed, exp in the past"
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => TokenVerdict::Valid(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => TokenVerdict::Expired,
                _ => TokenVerdict::Invalid,
            },
        }
    }
}

/// Fresh keypair per call; tests never ship PEM fixtures.
#[cfg(test)]
pub(crate) fn test_keypair_pem() -> (String, String) {
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};

    let mut rng = rand_core::OsRng;
    let private = rsa::RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let public = private.to_public_key();

    let private_pem = private
        .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap()
        .to_string();
    let public_pem = public
        .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
        .unwrap();
    (private_pem, public_pem)
}

#[cfg(test)]
pub(crate) fn test_codec() -> JwtRs256Codec {
    let (private_pem, public_pem) = test_keypair_pem();
    JwtRs256Codec::new(private_pem.as_bytes(), public_pem.as_bytes()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{SessionId, TokenKind, UserId};
    use chrono::Utc;

    fn claims_expiring_in(secs: i64) -> TokenClaims {
        TokenClaims::new(
            TokenKind::Access,
            UserId(uuid::Uuid::new_v4()),
            SessionId(uuid::Uuid::new_v4()),
            Utc::now().timestamp() + secs,
        )
    }

    #[test]
    fn verify_reproduces_signed_claims_exactly() {
        let codec = test_codec();
        let claims = claims_expiring_in(300);

        let token = codec.sign(&claims).unwrap();
        match codec.verify(&token) {
            TokenVerdict::Valid(decoded) => assert_eq!(decoded, claims),
            other => panic!("expected valid verdict, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_yields_expired_not_invalid() {
        let codec = test_codec();
        let claims = claims_expiring_in(-120);

        let token = codec.sign(&claims).unwrap();
        assert_eq!(codec.verify(&token), TokenVerdict::Expired);
    }

    #[test]
    fn garbage_input_is_invalid() {
        let codec = test_codec();
        assert_eq!(codec.verify("not-a-token"), TokenVerdict::Invalid);
        assert_eq!(codec.verify(""), TokenVerdict::Invalid);
    }

    #[test]
    fn tampered_signature_is_invalid_even_when_expired() {
        // signature check runs first: a broken token never reports Expired
        let codec = test_codec();
        let claims = claims_expiring_in(-120);

        let token = codec.sign(&claims).unwrap();
        let tampered = &token[..token.len() - 4];
        assert_eq!(codec.verify(tampered), TokenVerdict::Invalid);
    }

    #[test]
    fn token_from_another_keypair_is_invalid() {
        let codec = test_codec();
        let other = test_codec();
        let claims = claims_expiring_in(300);

        let token = other.sign(&claims).unwrap();
        assert_eq!(codec.verify(&token), TokenVerdict::Invalid);
    }

    #[test]
    fn refresh_claims_survive_the_roundtrip() {
        let codec = test_codec();
        let claims = TokenClaims::new(
            TokenKind::Refresh,
            UserId(uuid::Uuid::new_v4()),
            SessionId(uuid::Uuid::new_v4()),
            Utc::now().timestamp() + 86_400,
        );

        let token = codec.sign(&claims).unwrap();
        match codec.verify(&token) {
            TokenVerdict::Valid(decoded) => {
                assert_eq!(decoded.kind, TokenKind::Refresh);
                assert_eq!(decoded.session_id, claims.session_id);
            }
            other => panic!("expected valid verdict, got {other:?}"),
        }
    }
}
