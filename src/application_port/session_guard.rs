use crate::application_port::AuthError;
use crate::domain_model::AuthenticatedIdentity;

#[async_trait::async_trait]
pub trait SessionGuard: Send + Sync {
    /// Verifies an access credential and resolves its subject.
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedIdentity, AuthError>;
}
