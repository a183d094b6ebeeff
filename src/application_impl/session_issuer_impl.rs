use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Refresh credentials become single-use when set.
    pub rotate_refresh_tokens: bool,
}

pub struct RealSessionIssuer {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_codec: Arc<dyn TokenCodec>,
    revocation_store: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
    policy: SessionPolicy,
}

impl RealSessionIssuer {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_codec: Arc<dyn TokenCodec>,
        revocation_store: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            token_codec,
            revocation_store,
            clock,
            policy,
        }
    }

    fn issue_pair(&self, user_id: UserId) -> Result<(IssuedToken, IssuedToken), AuthError> {
        let access = self
            .token_codec
            .issue(user_id, TokenKind::Access, self.policy.access_ttl)?;
        let refresh = self
            .token_codec
            .issue(user_id, TokenKind::Refresh, self.policy.refresh_ttl)?;
        Ok((access, refresh))
    }
}

#[async_trait::async_trait]
impl SessionIssuer for RealSessionIssuer {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { username, password } = request;

        let Some(rec) = self.user_repo.get_by_username(&username).await? else {
            debug!(%username, "login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !rec.is_active {
            debug!(%username, "login rejected: inactive user");
            return Err(AuthError::InvalidCredentials);
        }

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await?;
        if !ok {
            debug!(%username, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let (access, refresh) = self.issue_pair(rec.user_id)?;
        info!(user_id = %rec.user_id, "session issued");

        Ok(LoginResult {
            access,
            refresh,
            identity: rec.identity(),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self.token_codec.verify(refresh_token, TokenKind::Refresh)?;
        let user_id = claims.subject;

        match self.user_repo.get_by_id(user_id).await? {
            Some(rec) if rec.is_active => {}
            _ => {
                debug!(%user_id, "refresh rejected: subject gone or inactive");
                return Err(AuthError::SubjectNotFound);
            }
        }

        if !self.policy.rotate_refresh_tokens {
            if self.revocation_store.is_revoked(&claims.jti).await? {
                debug!(jti = %claims.jti, "refresh rejected: revoked");
                return Err(AuthError::Revoked);
            }
            let access = self
                .token_codec
                .issue(user_id, TokenKind::Access, self.policy.access_ttl)?;
            return Ok(RefreshResult {
                access,
                refresh: None,
            });
        }

        // Rotation: consuming the old jti is the single point of contention.
        let record = RevocationRecord {
            jti: claims.jti.clone(),
            subject: user_id,
            revoked_at: self.clock.now(),
            expires_at: claims.expires_at,
        };
        if !self.revocation_store.revoke(record).await? {
            debug!(jti = %claims.jti, "refresh rejected: already consumed");
            return Err(AuthError::Revoked);
        }

        let (access, refresh) = self.issue_pair(user_id)?;
        debug!(old = %claims.jti, new = %refresh.jti, "refresh credential rotated");

        Ok(RefreshResult {
            access,
            refresh: Some(refresh),
        })
    }
}
