use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub team: Option<TeamId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            team: self.team,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("team does not exist")]
    UnknownTeam,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Identity collaborator. Password hashing happens before records get here.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a user. Username uniqueness and the team FK are enforced here.
    async fn create(&self, record: UserRecord) -> Result<(), CreateUserError>;

    /// Fetch by username (for login).
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, AuthError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;

    async fn team_exists(&self, team_id: TeamId) -> Result<bool, AuthError>;
}
