#![allow(dead_code)]

use argon2::Params;
use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use taskgate::api::{self, CookiePolicy};
use taskgate::application_impl::*;
use taskgate::application_port::*;
use taskgate::domain_model::*;
use taskgate::domain_port::*;
use taskgate::infra_memory::*;
use taskgate::server::{Server, ServerParts};
use warp::Filter;
use warp::hyper::body::Bytes;

pub const ACCESS_TTL: Duration = Duration::from_secs(300);
pub const REFRESH_TTL: Duration = Duration::from_secs(86_400);

pub struct TestApp {
    pub server: Arc<Server>,
    pub users: Arc<MemoryUserRepo>,
    pub revocations: Arc<MemoryRevocationStore>,
    pub clock: Arc<ManualClock>,
    hasher: Arc<Argon2PasswordHasher>,
}

pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_rotation(false)
    }

    pub fn with_rotation(rotate_refresh_tokens: bool) -> Self {
        let users = Arc::new(MemoryUserRepo::new());
        let revocations = Arc::new(MemoryRevocationStore::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let hasher = Arc::new(Argon2PasswordHasher::with_params(
            Params::new(8, 1, 1, None).unwrap(),
        ));

        let server = Server::from_parts(ServerParts {
            user_repo: users.clone(),
            revocation_store: revocations.clone(),
            credential_hasher: hasher.clone(),
            clock: clock.clone(),
            jwt: JwtConfig {
                issuer: "taskgate.test".to_string(),
                audience: "taskgate-tests".to_string(),
                signing_key: b"integration-test-key".to_vec(),
            },
            policy: SessionPolicy {
                access_ttl: ACCESS_TTL,
                refresh_ttl: REFRESH_TTL,
                rotate_refresh_tokens,
            },
            cookie_policy: CookiePolicy::default(),
        });

        TestApp {
            server: Arc::new(server),
            users,
            revocations,
            clock,
            hasher,
        }
    }

    /// Inserts a user directly, skipping the registration password rules.
    pub async fn add_user(&self, username: &str, password: &str) -> UserId {
        let user_id = UserId::new();
        let password_hash = self.hasher.hash_password(password).await.unwrap();
        self.users
            .create(UserRecord {
                user_id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                team: None,
                is_active: true,
                created_at: start_time(),
            })
            .await
            .unwrap();
        user_id
    }

    pub async fn login(&self, username: &str, password: &str) -> LoginResult {
        self.server
            .session_issuer
            .login(LoginInput {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }
}

pub fn app_filter(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone + 'static {
    api::routes(server).recover(api::recover_error)
}

pub fn set_cookies(response: &warp::http::Response<Bytes>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn json_body(response: &warp::http::Response<Bytes>) -> serde_json::Value {
    serde_json::from_slice(response.body()).unwrap()
}
