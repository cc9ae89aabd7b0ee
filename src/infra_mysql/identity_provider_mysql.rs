use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::IdentityProvider;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::{MySqlPool, Row};

/// Credential authority over the `identity` table. Passwords are stored as
/// argon2 PHC strings and never leave this adapter.
pub struct MySqlIdentityProvider {
    pool: MySqlPool,
}

impl MySqlIdentityProvider {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlIdentityProvider { pool }
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::Internal(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Internal(format!("verify error: {e}"))),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MySqlIdentityProvider {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, AuthError> {
        let Some(row) =
            sqlx::query("SELECT user_id, password_hash FROM identity WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Store(format!("query identity: {e}")))?
        else {
            return Ok(None);
        };

        let password_hash: String = row.get("password_hash");
        if !Self::verify_password(password, &password_hash)? {
            return Ok(None);
        }

        Ok(Some(Identity {
            id: row.get::<UserId, _>("user_id"),
            username: username.to_string(),
        }))
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let id = UserId(uuid::Uuid::new_v4());
        let password_hash = Self::hash_password(password)?;

        sqlx::query(
            r#"
INSERT INTO identity (user_id, username, password_hash)
VALUES (?, ?, ?)
"#,
        )
        .bind(id.0.as_bytes() as &[u8])
        .bind(username)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::DuplicateUsername
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(Identity {
            id,
            username: username.to_string(),
        })
    }
}
