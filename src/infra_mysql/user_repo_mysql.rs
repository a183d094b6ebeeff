use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    #[inline]
    fn uuid_from_bytes(id: &[u8]) -> Result<Uuid, AuthError> {
        Uuid::from_slice(id).map_err(|e| AuthError::Store(e.to_string()))
    }

    fn row_to_record(row: MySqlRow) -> Result<UserRecord, AuthError> {
        let store = |e: sqlx::Error| AuthError::Store(e.to_string());

        let user_id_bytes: Vec<u8> = row.try_get("user_id").map_err(store)?;
        let team_bytes: Option<Vec<u8>> = row.try_get("team_id").map_err(store)?;
        let team = team_bytes
            .as_deref()
            .map(Self::uuid_from_bytes)
            .transpose()?
            .map(TeamId);

        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(store)?;

        Ok(UserRecord {
            user_id: UserId(Self::uuid_from_bytes(&user_id_bytes)?),
            username: row.try_get("username").map_err(store)?,
            email: row.try_get("email").map_err(store)?,
            password_hash: row.try_get("password_hash").map_err(store)?,
            team,
            is_active: row.try_get("is_active").map_err(store)?,
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create(&self, record: UserRecord) -> Result<(), CreateUserError> {
        let result = sqlx::query(
            r#"
INSERT INTO user (user_id, username, email, password_hash, team_id, is_active, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(record.user_id.0.as_bytes() as &[u8])
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.team.map(|t| t.0.as_bytes().to_vec()))
        .bind(record.is_active)
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(CreateUserError::UsernameTaken)
            }
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(CreateUserError::UnknownTeam)
            }
            Err(e) => Err(AuthError::Store(e.to_string()).into()),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT user_id, username, email, password_hash, team_id, is_active, created_at
FROM user
WHERE username = ?
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT user_id, username, email, password_hash, team_id, is_active, created_at
FROM user
WHERE user_id = ?
"#,
        )
        .bind(user_id.0.as_bytes() as &[u8])
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM user WHERE username = ?"#)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }

    async fn team_exists(&self, team_id: TeamId) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(1) FROM team WHERE team_id = ?"#)
            .bind(team_id.0.as_bytes() as &[u8])
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }
}
