use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisWrite, ToRedisArgs};

/// Revoked jtis live as `<prefix>:<jti>` keys that expire together with
/// the credential they block.
pub struct RedisRevocationStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRevocationStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRevocationStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, jti: &str) -> String {
        format!("{}:{}", self.prefix, jti)
    }

    fn ttl_secs(from: DateTime<Utc>, until: DateTime<Utc>) -> u64 {
        let secs = (until - from).num_seconds();
        if secs <= 0 { 1 } else { secs as u64 }
    }
}

impl ToRedisArgs for UserId {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

#[async_trait::async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, record: RevocationRecord) -> Result<bool, AuthError> {
        let key = self.key(&record.jti);
        let ttl_secs = Self::ttl_secs(record.revoked_at, record.expires_at);
        let mut conn = self.conn.clone();

        // SET NX replies OK for the first writer and nil for everyone else.
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&record.subject)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(reply.is_some())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        let key = self.key(jti);
        let mut conn = self.conn.clone();
        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(exists)
    }
}
