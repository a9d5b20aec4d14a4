use crate::application_port::{AuthError, CredentialHasher};
use crate::logger::*;
use crate::settings::Hasher;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// Argon2id hasher. Cost parameters live inside each PHC string, so hashes
/// made under older settings keep verifying after the settings change.
///
/// Also accepts bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) left over from
/// accounts created before the switch to Argon2.
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new(params: Params) -> Self {
        Argon2CredentialHasher {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn from_settings(settings: &Hasher) -> Result<Self, AuthError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| AuthError::HashingFailure(format!("argon2 params: {e}")))?;
        Ok(Self::new(params))
    }

    fn is_bcrypt(password_hash: &str) -> bool {
        ["$2a$", "$2b$", "$2y$"]
            .iter()
            .any(|prefix| password_hash.starts_with(prefix))
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[async_trait::async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if Self::is_bcrypt(password_hash) {
            return match bcrypt::verify(password, password_hash) {
                Ok(ok) => ok,
                Err(e) => {
                    warn!("unreadable bcrypt hash: {}", e);
                    false
                }
            };
        }

        let parsed = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("unreadable PHC hash: {}", e);
                return false;
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!("password verify error: {}", e);
                false
            }
        }
    }
}
