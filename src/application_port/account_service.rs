use crate::application_port::AuthError;
use crate::domain_model::{TeamId, UserId, UserProfile};

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub team: Option<TeamId>,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    async fn register(&self, request: RegisterInput) -> Result<UserProfile, AuthError>;
    async fn profile(&self, user_id: UserId) -> Result<UserProfile, AuthError>;
}
