use crate::api::CookiePolicy;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

const DEV_SIGNING_KEY: &str = "taskgate-dev-secret-key";

/// Everything the services are built from. Tests assemble this directly
/// with in-memory stores and a manual clock.
pub struct ServerParts {
    pub user_repo: Arc<dyn UserRepo>,
    pub revocation_store: Arc<dyn RevocationStore>,
    pub credential_hasher: Arc<dyn CredentialHasher>,
    pub clock: Arc<dyn Clock>,
    pub jwt: JwtConfig,
    pub policy: SessionPolicy,
    pub cookie_policy: CookiePolicy,
}

pub struct Server {
    pub session_issuer: Arc<dyn SessionIssuer>,
    pub session_guard: Arc<dyn SessionGuard>,
    pub logout_coordinator: Arc<dyn LogoutCoordinator>,
    pub account_service: Arc<dyn AccountService>,
    pub cookie_policy: CookiePolicy,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let pool = match settings.store.mysql_dsn.as_deref() {
            Some(dsn) if settings.store.users == "mysql" || settings.store.revocation == "mysql" => {
                Some(Pool::<MySql>::connect(dsn).await?)
            }
            _ => None,
        };
        let require_pool = || {
            pool.clone()
                .ok_or_else(|| anyhow::anyhow!("store.mysql_dsn is required for the mysql backend"))
        };

        let user_repo: Arc<dyn UserRepo> = match settings.store.users.as_str() {
            "memory" => Arc::new(MemoryUserRepo::new()),
            "mysql" => Arc::new(MySqlUserRepo::new(require_pool()?)),
            other => return Err(anyhow::anyhow!("Unknown users backend: {}", other)),
        };

        let revocation_store: Arc<dyn RevocationStore> = match settings.store.revocation.as_str() {
            "memory" => Arc::new(MemoryRevocationStore::new()),
            "mysql" => Arc::new(MySqlRevocationStore::new(require_pool()?)),
            "redis" => {
                let dsn = settings
                    .store
                    .redis_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.redis_dsn is required for redis"))?;
                let redis_client = redis::Client::open(dsn)?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisRevocationStore::new(
                    redis_manager,
                    settings.store.redis_prefix.clone(),
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown revocation backend: {}", other)),
        };

        let signing_key = match std::env::var("JWT_SIGNING_KEY") {
            Ok(key) if !key.is_empty() => key.into_bytes(),
            _ => {
                warn!("JWT_SIGNING_KEY is not set, using the development key");
                DEV_SIGNING_KEY.as_bytes().to_vec()
            }
        };

        let parts = ServerParts {
            user_repo,
            revocation_store,
            credential_hasher: Arc::new(Argon2PasswordHasher::new()),
            clock: Arc::new(SystemClock),
            jwt: JwtConfig {
                issuer: settings.auth.issuer.clone(),
                audience: settings.auth.audience.clone(),
                signing_key,
            },
            policy: SessionPolicy {
                access_ttl: Duration::from_secs(settings.auth.access_ttl_secs),
                refresh_ttl: Duration::from_secs(settings.auth.refresh_ttl_secs),
                rotate_refresh_tokens: settings.auth.rotate_refresh_tokens,
            },
            cookie_policy: CookiePolicy {
                secure: settings.auth.secure_cookies,
            },
        };

        let mut server = Self::from_parts(parts);
        server.pool = pool;

        info!(
            users = %settings.store.users,
            revocation = %settings.store.revocation,
            rotate_refresh_tokens = settings.auth.rotate_refresh_tokens,
            "server started"
        );
        Ok(server)
    }

    pub fn from_parts(parts: ServerParts) -> Self {
        let ServerParts {
            user_repo,
            revocation_store,
            credential_hasher,
            clock,
            jwt,
            policy,
            cookie_policy,
        } = parts;

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(jwt, clock.clone()));

        let session_issuer: Arc<dyn SessionIssuer> = Arc::new(RealSessionIssuer::new(
            user_repo.clone(),
            credential_hasher.clone(),
            token_codec.clone(),
            revocation_store.clone(),
            clock.clone(),
            policy,
        ));
        let session_guard: Arc<dyn SessionGuard> =
            Arc::new(RealSessionGuard::new(user_repo.clone(), token_codec.clone()));
        let logout_coordinator: Arc<dyn LogoutCoordinator> = Arc::new(RealLogoutCoordinator::new(
            token_codec,
            revocation_store,
            clock.clone(),
        ));
        let account_service: Arc<dyn AccountService> =
            Arc::new(RealAccountService::new(user_repo, credential_hasher, clock));

        Self {
            session_issuer,
            session_guard,
            logout_coordinator,
            account_service,
            cookie_policy,
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
