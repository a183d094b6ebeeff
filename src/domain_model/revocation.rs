use crate::domain_model::UserId;
use chrono::{DateTime, Utc};

/// A refresh credential that must no longer be honored.
///
/// `expires_at` is the credential's own expiry; past that point the record
/// is dead weight and may be purged by a retention job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRecord {
    pub jti: String,
    pub subject: UserId,
    pub revoked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
