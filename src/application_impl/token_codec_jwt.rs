use crate::application_port::*;
use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String, // user id as string
    token_type: TokenKind,
    jti: String,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(&cfg.signing_key);
        let decoding_key = DecodingKey::from_secret(&cfg.signing_key);
        JwtHs256Codec {
            cfg,
            clock,
            encoding_key,
            decoding_key,
        }
    }

    #[inline]
    fn gen_jti() -> String {
        Uuid::new_v4().to_string()
    }

    fn validation(&self) -> Validation {
        // Expiry is checked against our own clock, with no leeway.
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = false;
        v.leeway = 0;
        v.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        v.set_audience(&[self.cfg.audience.clone()]);
        v.set_issuer(&[self.cfg.issuer.clone()]);
        v
    }
}

impl TokenCodec for JwtHs256Codec {
    fn issue(
        &self,
        subject: UserId,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        // Claims carry whole seconds, so the reported instants do too.
        let issued_at = DateTime::from_timestamp(self.clock.now().timestamp(), 0)
            .ok_or_else(|| AuthError::InternalError("clock out of range".to_string()))?;
        let ttl = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| AuthError::InternalError("ttl out of range".to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::InternalError("ttl out of range".to_string()))?;

        let jti = Self::gen_jti();
        let claims = TokenClaims {
            sub: subject.to_string(),
            token_type: kind,
            jti: jti.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.cfg.issuer.clone(),
            aud: self.cfg.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            issued_at,
            expires_at,
        })
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|_| TokenError::Malformed)?;
        let claims = data.claims;

        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Malformed)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        if self.clock.now() >= expires_at {
            return Err(TokenError::Expired);
        }
        if claims.token_type != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(Claims {
            subject,
            kind: claims.token_type,
            jti: claims.jti,
            issued_at,
            expires_at,
        })
    }
}
