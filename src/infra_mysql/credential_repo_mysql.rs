use super::util::{is_dup_key, store_error};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlCredentialRepo {
    pool: MySqlPool,
}

impl MySqlCredentialRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlCredentialRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<CredentialRecord, AuthError> {
        let id: u64 = row.try_get("id").map_err(store_error)?;
        let identifier: String = row.try_get("email").map_err(store_error)?;
        let display_name: String = row.try_get("full_name").map_err(store_error)?;
        let password_hash: String = row.try_get("password_hash").map_err(store_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(store_error)?;

        Ok(CredentialRecord {
            user_id: UserId(id.to_string()),
            identifier,
            display_name,
            password_hash,
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl CredentialRepo for MySqlCredentialRepo {
    async fn create_user(
        &self,
        identifier: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<UserId, AuthError> {
        let result = sqlx::query(
            r#"
INSERT INTO users (email, full_name, password_hash)
VALUES (?, ?, ?)
"#,
        )
        .bind(identifier)
        .bind(display_name)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::UserExists
            } else {
                store_error(e)
            }
        })?;

        Ok(UserId(result.last_insert_id().to_string()))
    }

    async fn delete_by_identifier(&self, identifier: &str) -> Result<(), AuthError> {
        sqlx::query(
            r#"
DELETE FROM users
WHERE email = ?
"#,
        )
        .bind(identifier)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, email, full_name, password_hash, created_at
FROM users
WHERE email = ?
"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row_opt.map(Self::row_to_record).transpose()
    }
}
