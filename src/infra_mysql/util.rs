use crate::application_port::AuthError;
use sqlx::mysql::MySqlDatabaseError;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// Row shape problems are our bug; everything else means the database could
/// not answer.
pub fn store_error(err: sqlx::Error) -> AuthError {
    match err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => AuthError::InternalError(err.to_string()),
        _ => AuthError::StoreUnavailable(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn connectivity_failures_are_unavailable() {
        assert!(store_error(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(store_error(sqlx::Error::PoolClosed).is_unavailable());
        assert!(
            store_error(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
            .is_unavailable()
        );
    }

    #[test]
    fn row_shape_problems_are_internal() {
        let err = store_error(sqlx::Error::ColumnNotFound("revoked".to_string()));
        assert!(matches!(err, AuthError::InternalError(_)));
        assert!(!err.is_unavailable());

        let err = store_error(sqlx::Error::ColumnIndexOutOfBounds { index: 5, len: 3 });
        assert!(matches!(err, AuthError::InternalError(_)));
    }

    #[test]
    fn only_database_errors_can_be_duplicates() {
        assert!(!is_dup_key(&sqlx::Error::PoolTimedOut));
        assert!(!is_dup_key(&sqlx::Error::RowNotFound));
    }
}
