use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Process-local refresh token store. Lookups and revokes on one token go
/// through the same shard lock, so a finished revoke is seen by every later
/// lookup.
#[derive(Default, Clone)]
pub struct MemoryRefreshTokenRepo {
    records: Arc<DashMap<String, RefreshTokenRecord>>,
}

impl MemoryRefreshTokenRepo {
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
impl RefreshTokenRepo for MemoryRefreshTokenRepo {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AuthError> {
        match self.records.entry(record.token.clone()) {
            Entry::Occupied(_) => Err(AuthError::InternalError(
                "duplicate refresh token".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self.records.get(token).map(|r| r.value().clone()))
    }

    async fn mark_revoked(&self, token: &str) -> Result<bool, AuthError> {
        match self.records.get_mut(token) {
            Some(mut rec) => {
                rec.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
