use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::MySqlPool;

pub struct MySqlRevocationStore {
    pool: MySqlPool,
}

impl MySqlRevocationStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRevocationStore { pool }
    }
}

#[async_trait::async_trait]
impl RevocationStore for MySqlRevocationStore {
    async fn revoke(&self, record: RevocationRecord) -> Result<bool, AuthError> {
        // The primary key on jti makes this an atomic insert-if-absent.
        let result = sqlx::query(
            r#"
INSERT IGNORE INTO revoked_refresh_token (jti, user_id, revoked_at, expires_at)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(&record.jti)
        .bind(record.subject.0.as_bytes() as &[u8])
        .bind(record.revoked_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(1) FROM revoked_refresh_token WHERE jti = ?"#)
                .bind(jti)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }
}
