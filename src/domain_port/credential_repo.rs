use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub identifier: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait CredentialRepo: Send + Sync {
    /// Insert a user with an already hashed password.
    /// Fails with `AuthError::UserExists` when the identifier is taken.
    async fn create_user(
        &self,
        identifier: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<UserId, AuthError>;

    /// Remove a user created by `create_user`. Used to undo a registration
    /// whose token pair could not be issued. Missing users are not an error.
    async fn delete_by_identifier(&self, identifier: &str) -> Result<(), AuthError>;

    /// Fetch credentials by login identifier.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError>;
}
