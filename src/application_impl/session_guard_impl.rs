use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealSessionGuard {
    user_repo: Arc<dyn UserRepo>,
    token_codec: Arc<dyn TokenCodec>,
}

impl RealSessionGuard {
    pub fn new(user_repo: Arc<dyn UserRepo>, token_codec: Arc<dyn TokenCodec>) -> Self {
        Self {
            user_repo,
            token_codec,
        }
    }
}

#[async_trait::async_trait]
impl SessionGuard for RealSessionGuard {
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let claims = self.token_codec.verify(access_token, TokenKind::Access)?;

        let rec = self
            .user_repo
            .get_by_id(claims.subject)
            .await?
            .ok_or(AuthError::SubjectNotFound)?;
        if !rec.is_active {
            return Err(AuthError::SubjectNotFound);
        }

        Ok(rec.identity())
    }
}
