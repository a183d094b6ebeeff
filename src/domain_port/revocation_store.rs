use crate::application_port::*;
use crate::domain_model::*;

/// Revocation ledger for refresh credentials, keyed by jti.
///
/// Implementations must give read-after-write consistency: once `revoke`
/// returns, `is_revoked` on the same jti returns `true` for every caller.
#[async_trait::async_trait]
pub trait RevocationStore: Send + Sync {
    /// Atomically insert the record unless its jti is already present.
    /// Returns `true` only for the call that inserted it.
    async fn revoke(&self, record: RevocationRecord) -> Result<bool, AuthError>;

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError>;
}
