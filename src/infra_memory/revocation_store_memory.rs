use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Process-local ledger. Insert-if-absent runs under the shard lock, so
/// concurrent revokes of one jti have exactly one winner.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    records: DashMap<String, RevocationRecord>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, record: RevocationRecord) -> Result<bool, AuthError> {
        match self.records.entry(record.jti.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
        }
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        Ok(self.records.contains_key(jti))
    }
}
