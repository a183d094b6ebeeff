use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealLogoutCoordinator {
    token_codec: Arc<dyn TokenCodec>,
    revocation_store: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
}

impl RealLogoutCoordinator {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        revocation_store: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            token_codec,
            revocation_store,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl LogoutCoordinator for RealLogoutCoordinator {
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.token_codec.verify(refresh_token, TokenKind::Refresh)?;

        let record = RevocationRecord {
            jti: claims.jti.clone(),
            subject: claims.subject,
            revoked_at: self.clock.now(),
            expires_at: claims.expires_at,
        };
        let inserted = self.revocation_store.revoke(record).await?;
        if inserted {
            info!(user_id = %claims.subject, jti = %claims.jti, "refresh credential revoked");
        } else {
            debug!(jti = %claims.jti, "refresh credential already revoked");
        }

        Ok(())
    }
}
