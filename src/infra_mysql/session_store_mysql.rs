use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::SessionStore;
use sqlx::{MySqlPool, Row};

/// Sessions persisted in `auth_session` with BINARY(16) ids. Reads always go
/// to the pool, so a revocation is visible to the next `get` on any
/// connection.
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlSessionStore { pool }
    }
}

#[async_trait::async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create(&self, user_id: UserId) -> Result<Session, AuthError> {
        let session = Session::new(user_id);

        sqlx::query(
            r#"
INSERT INTO auth_session (session_id, user_id, created_at, revoked)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(session.id.0.as_bytes() as &[u8])
        .bind(session.user_id.0.as_bytes() as &[u8])
        .bind(session.created_at)
        .bind(session.revoked)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(session)
    }

    async fn get(&self, id: SessionId) -> Result<Session, AuthError> {
        if let Some(row) = sqlx::query(
            "SELECT session_id, user_id, created_at, revoked FROM auth_session WHERE session_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(format!("query session: {e}")))?
        {
            return Ok(Session {
                id: row.get::<SessionId, _>("session_id"),
                user_id: row.get::<UserId, _>("user_id"),
                created_at: row.get("created_at"),
                revoked: row.get("revoked"),
            });
        }

        Err(AuthError::SessionNotFound)
    }

    async fn revoke(&self, id: SessionId) -> Result<(), AuthError> {
        // no row and an already-revoked row are both fine; revoked is
        // terminal and the write is idempotent
        sqlx::query("UPDATE auth_session SET revoked = 1 WHERE session_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }
}
