use crate::application_port::*;
use crate::domain_port::AccessTokenCache;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Process-local allowlist used by the dev profile and tests. Entries carry
/// an absolute deadline and are swept lazily on read.
pub struct MemoryAccessTokenCache {
    entries: DashMap<String, DateTime<Utc>>,
}

impl MemoryAccessTokenCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryAccessTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AccessTokenCache for MemoryAccessTokenCache {
    async fn register(&self, token: &str, ttl_secs: u64) -> Result<(), AuthError> {
        let deadline = Utc::now() + Duration::seconds(ttl_secs as i64);
        self.entries.insert(token.to_string(), deadline);
        Ok(())
    }

    async fn is_valid(&self, token: &str) -> Result<bool, AuthError> {
        // the guard must be gone before remove(), both touch the same shard
        let expired = match self.entries.get(token) {
            Some(deadline) => {
                if Utc::now() < *deadline {
                    return Ok(true);
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(token);
        }
        Ok(false)
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.entries.remove(token);
        Ok(())
    }
}
