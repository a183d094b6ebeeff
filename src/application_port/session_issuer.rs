use crate::application_port::{AuthError, LoginInput, LoginResult, RefreshResult};

#[async_trait::async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Unknown user and wrong password are both `InvalidCredentials`.
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError>;
}
