use crate::application_port::AuthError;
use crate::logger::*;
use std::future::Future;
use std::time::Duration;

/// Bounds one store round-trip. An elapsed timer drops the pending call and
/// reports the store as unavailable; every adapter write is a single
/// statement, so nothing is left half-written.
pub async fn with_store_timeout<T, F>(
    timeout: Duration,
    op: &'static str,
    fut: F,
) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(op, timeout_ms = timeout.as_millis() as u64, "store call timed out");
            Err(AuthError::StoreUnavailable(format!("{op} timed out")))
        }
    }
}
