use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::SessionStore;
use dashmap::DashMap;

pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: UserId) -> Result<Session, AuthError> {
        let session = Session::new(user_id);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: SessionId) -> Result<Session, AuthError> {
        self.sessions
            .get(&id)
            .map(|session| session.clone())
            .ok_or(AuthError::SessionNotFound)
    }

    async fn revoke(&self, id: SessionId) -> Result<(), AuthError> {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.revoked = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_sessions_start_active_with_distinct_ids() {
        let store = MemorySessionStore::new();
        let user = UserId(uuid::Uuid::new_v4());

        let a = store.create(user).await.unwrap();
        let b = store.create(user).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(!a.revoked);
        assert_eq!(store.get(a.id).await.unwrap().user_id, user);
    }

    #[tokio::test]
    async fn get_unknown_session_fails_with_not_found() {
        let store = MemorySessionStore::new();
        let err = store.get(SessionId(uuid::Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
        assert_eq!(err.to_string(), "Session does not exist.");
    }

    #[tokio::test]
    async fn revoke_is_idempotent_and_terminal() {
        let store = MemorySessionStore::new();
        let session = store.create(UserId(uuid::Uuid::new_v4())).await.unwrap();

        store.revoke(session.id).await.unwrap();
        assert!(store.get(session.id).await.unwrap().revoked);

        store.revoke(session.id).await.unwrap();
        assert!(store.get(session.id).await.unwrap().revoked);

        // unknown ids are a quiet no-op
        store.revoke(SessionId(uuid::Uuid::new_v4())).await.unwrap();
    }
}
