use super::util::store_error;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// `refresh_tokens` table. Each method is one autocommitted statement, which
/// is what gives revoke-then-lookup its read-after-write guarantee.
///
/// The `token` column must use a binary collation (`ascii_bin`, see
/// `sql/auth_schema.sql`); tokens are case-sensitive base64url.
pub struct MySqlRefreshTokenRepo {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRefreshTokenRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<RefreshTokenRecord, AuthError> {
        let token: String = row.try_get("token").map_err(store_error)?;
        let user_id: String = row.try_get("user_id").map_err(store_error)?;
        let issued_at: DateTime<Utc> = row.try_get("created_at").map_err(store_error)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(store_error)?;
        let revoked: bool = row.try_get("revoked").map_err(store_error)?;

        Ok(RefreshTokenRecord {
            token,
            user_id: UserId(user_id),
            issued_at,
            expires_at,
            revoked,
        })
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepo for MySqlRefreshTokenRepo {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AuthError> {
        sqlx::query(
            r#"
INSERT INTO refresh_tokens (token, user_id, created_at, expires_at, revoked)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(&record.token)
        .bind(record.user_id.as_str())
        .bind(record.issued_at)
        .bind(record.expires_at)
        .bind(record.revoked)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT token, user_id, created_at, expires_at, revoked
FROM refresh_tokens
WHERE token = ?
"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        // Only the exact spelling matches, whatever collation the column has.
        Ok(row_opt
            .map(Self::row_to_record)
            .transpose()?
            .filter(|record| record.token == token))
    }

    async fn mark_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let result = sqlx::query(
            r#"
UPDATE refresh_tokens
SET revoked = TRUE
WHERE token = ?
"#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Zero affected rows also covers "already revoked"; tell the two apart.
        let count: i64 = sqlx::query_scalar(
            r#"
SELECT COUNT(1)
FROM refresh_tokens
WHERE token = ?
"#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(count > 0)
    }
}
