use crate::application_port::AuthError;

#[async_trait::async_trait]
pub trait LogoutCoordinator: Send + Sync {
    /// Revokes a refresh credential. Revoking twice is not an error.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
}
