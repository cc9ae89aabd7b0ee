use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub token_cache: Arc<dyn AccessTokenCache>,
    cache_probe_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let cancel = CancellationToken::new();

        let private_pem = std::fs::read(&settings.token.private_key_path).map_err(|e| {
            anyhow::anyhow!("Cannot read {}: {}", settings.token.private_key_path, e)
        })?;
        let public_pem = std::fs::read(&settings.token.public_key_path).map_err(|e| {
            anyhow::anyhow!("Cannot read {}: {}", settings.token.public_key_path, e)
        })?;
        let token_codec: Arc<dyn TokenCodec> =
            Arc::new(JwtRs256Codec::new(&private_pem, &public_pem)?);

        let needs_mysql = settings.session_store.backend == "mysql"
            || settings.identity.backend == "mysql";
        let pool = if needs_mysql {
            Some(Pool::<MySql>::connect(&settings.mysql.url).await?)
        } else {
            None
        };

        // An unreachable cache must not stop startup; the probe keeps
        // retrying in the background until the backend answers.
        let (token_cache, cache_probe_handle): (Arc<dyn AccessTokenCache>, _) =
            match settings.token_cache.backend.as_str() {
                "redis" => {
                    let cache = Arc::new(
                        RedisAccessTokenCache::connect(
                            &settings.redis.url,
                            &settings.redis.key_prefix,
                        )
                        .await,
                    );
                    let probe = tokio::spawn(cache.clone().run_reconnect(cancel.clone()));
                    (cache, Some(probe))
                }
                "memory" => (Arc::new(MemoryAccessTokenCache::new()), None),
                other => return Err(anyhow::anyhow!("Unknown token_cache backend: {}", other)),
            };

        let session_store: Arc<dyn SessionStore> = match settings.session_store.backend.as_str() {
            "mysql" => {
                let Some(pool) = pool.clone() else {
                    return Err(anyhow::anyhow!("MySQL pool missing for session store"));
                };
                Arc::new(MySqlSessionStore::new(pool))
            }
            "memory" => Arc::new(MemorySessionStore::new()),
            other => return Err(anyhow::anyhow!("Unknown session_store backend: {}", other)),
        };

        let identity_provider: Arc<dyn IdentityProvider> = match settings.identity.backend.as_str()
        {
            "mysql" => {
                let Some(pool) = pool.clone() else {
                    return Err(anyhow::anyhow!("MySQL pool missing for identity provider"));
                };
                Arc::new(MySqlIdentityProvider::new(pool))
            }
            "fake" => Arc::new(FakeIdentityProvider::new()),
            other => return Err(anyhow::anyhow!("Unknown identity backend: {}", other)),
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            identity_provider.clone(),
            session_store,
            token_cache.clone(),
            token_codec,
            settings.token.access_ttl_secs,
            settings.token.refresh_ttl_secs,
        ));

        info!("server started");

        Ok(Self {
            auth_service,
            identity_provider,
            token_cache,
            cache_probe_handle: Mutex::new(cache_probe_handle),
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        if let Ok(mut lock) = self.cache_probe_handle.lock() {
            if let Some(handle) = lock.take() {
                let r = handle.await;
                info!("cache probe handle dropped: {:?}", r);
            }
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
