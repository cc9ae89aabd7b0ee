use crate::application_port::*;
use crate::domain_port::AccessTokenCache;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const RECONNECT_INTERVAL_SECS: u64 = 5;
const VALID_MARKER: &str = "valid";

enum CacheState {
    Connected(ConnectionManager),
    Disconnected,
}

/// Redis-backed allowlist. Keys are `{prefix}:{token}`, values the fixed
/// marker, TTL the token's remaining lifetime, so entries disappear in
/// lockstep with token expiry.
///
/// The connection state is explicit: a backend that is down at startup (or
/// found down later) leaves the client usable, with every operation failing
/// as `AuthError::Cache` until `run_reconnect` restores it.
pub struct RedisAccessTokenCache {
    state: RwLock<CacheState>,
    url: String,
    prefix: String,
}

impl RedisAccessTokenCache {
    /// Never fails: an unreachable backend yields a disconnected client.
    pub async fn connect(url: impl Into<String>, prefix: impl Into<String>) -> Self {
        let url = url.into();
        let state = match Self::open(&url).await {
            Ok(conn) => CacheState::Connected(conn),
            Err(e) => {
                warn!("token cache unreachable at startup: {e}");
                CacheState::Disconnected
            }
        };

        Self {
            state: RwLock::new(state),
            url,
            prefix: prefix.into(),
        }
    }

    async fn open(url: &str) -> Result<ConnectionManager, redis::RedisError> {
        let client = redis::Client::open(url)?;
        client.get_connection_manager().await
    }

    pub async fn is_connected(&self) -> bool {
        matches!(&*self.state.read().await, CacheState::Connected(_))
    }

    /// Retry loop for a cache that started disconnected. Exits once the
    /// connection is up (the manager re-establishes dropped connections on
    /// its own afterwards) or when the cancellation token fires.
    pub async fn run_reconnect(self: Arc<Self>, cancel: CancellationToken) {
        loop {
            if self.is_connected().await {
                return;
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)) => {}
            }

            match Self::open(&self.url).await {
                Ok(conn) => {
                    *self.state.write().await = CacheState::Connected(conn);
                    info!("token cache connection established");
                    return;
                }
                Err(e) => warn!("token cache still unreachable: {e}"),
            }
        }
    }

    async fn conn(&self) -> Result<ConnectionManager, AuthError> {
        match &*self.state.read().await {
            CacheState::Connected(conn) => Ok(conn.clone()),
            CacheState::Disconnected => {
                Err(AuthError::Cache("token cache disconnected".to_string()))
            }
        }
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.prefix, token)
    }
}

#[async_trait::async_trait]
impl AccessTokenCache for RedisAccessTokenCache {
    async fn register(&self, token: &str, ttl_secs: u64) -> Result<(), AuthError> {
        let key = self.key(token);
        let mut conn = self.conn().await?;
        let _: () = conn
            .set_ex(&key, VALID_MARKER, ttl_secs)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(())
    }

    async fn is_valid(&self, token: &str) -> Result<bool, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(value.as_deref() == Some(VALID_MARKER))
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let key = self.key(token);
        let mut conn = self.conn().await?;
        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // port 1 is never a redis server; connect must degrade, not panic
    #[tokio::test]
    async fn unreachable_backend_degrades_to_disconnected() {
        let cache = RedisAccessTokenCache::connect("redis://127.0.0.1:1", "access_token").await;
        assert!(!cache.is_connected().await);

        let err = cache.is_valid("some-token").await.unwrap_err();
        assert!(matches!(err, AuthError::Cache(_)));
        assert!(matches!(
            cache.register("some-token", 60).await.unwrap_err(),
            AuthError::Cache(_)
        ));
        assert!(matches!(
            cache.revoke("some-token").await.unwrap_err(),
            AuthError::Cache(_)
        ));
    }

    #[tokio::test]
    async fn reconnect_task_stops_on_cancellation() {
        let cache =
            Arc::new(RedisAccessTokenCache::connect("redis://127.0.0.1:1", "access_token").await);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(cache.clone().run_reconnect(cancel.clone()));
        cancel.cancel();
        handle.await.unwrap();

        assert!(!cache.is_connected().await);
    }
}
