use std::fmt;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("signing secret is empty")]
    Empty,
    #[error("environment variable {0} is not set")]
    Missing(String),
}

/// Process-wide HMAC key shared by the access and refresh token paths.
///
/// Loaded once at startup and handed to constructors. `Debug` never prints
/// the key material.
#[derive(Clone)]
pub struct SigningSecret {
    key: Arc<[u8]>,
}

impl SigningSecret {
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, SecretError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(SigningSecret {
            key: Arc::from(key),
        })
    }

    pub fn from_env(var: &str) -> Result<Self, SecretError> {
        let value = std::env::var(var).map_err(|_| SecretError::Missing(var.to_string()))?;
        Self::new(value)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.key.len())
            .finish_non_exhaustive()
    }
}
