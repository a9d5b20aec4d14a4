use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Process-local credential store keyed by identifier.
#[derive(Default, Clone)]
pub struct MemoryCredentialRepo {
    by_identifier: Arc<DashMap<String, CredentialRecord>>,
}

impl MemoryCredentialRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CredentialRepo for MemoryCredentialRepo {
    async fn create_user(
        &self,
        identifier: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<UserId, AuthError> {
        match self.by_identifier.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(AuthError::UserExists),
            Entry::Vacant(slot) => {
                let user_id = UserId(uuid::Uuid::new_v4().to_string());
                slot.insert(CredentialRecord {
                    user_id: user_id.clone(),
                    identifier: identifier.to_string(),
                    display_name: display_name.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                });
                Ok(user_id)
            }
        }
    }

    async fn delete_by_identifier(&self, identifier: &str) -> Result<(), AuthError> {
        self.by_identifier.remove(identifier);
        Ok(())
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self
            .by_identifier
            .get(identifier)
            .map(|r| r.value().clone()))
    }
}
