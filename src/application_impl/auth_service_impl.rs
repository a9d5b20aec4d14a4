use crate::application_impl::store_timeout::with_store_timeout;
use crate::application_port::*;
use crate::domain_port::CredentialRepo;
use crate::logger::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Verified against when the identifier is unknown, so that branch pays for
/// one hash check like a wrong password does.
const DUMMY_PASSWORD: &str = "parley-unknown-identifier";

pub struct RealAuthService {
    credential_repo: Arc<dyn CredentialRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_service: Arc<dyn TokenService>,
    store_timeout: Duration,
    dummy_hash: OnceCell<String>,
}

impl RealAuthService {
    pub fn new(
        credential_repo: Arc<dyn CredentialRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_service: Arc<dyn TokenService>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            credential_repo,
            credential_hasher,
            token_service,
            store_timeout,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Burns one verify on the not-found branch of `login`.
    async fn verify_against_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.credential_hasher.hash_password(DUMMY_PASSWORD))
            .await;
        match dummy {
            Ok(hash) => {
                let _ = self.credential_hasher.verify_password(password, hash).await;
            }
            Err(e) => warn!("dummy hash unavailable: {}", e),
        }
    }

    /// Undo `create_user` after the token pair could not be issued, so the
    /// same registration can be retried.
    async fn undo_registration(&self, identifier: &str) {
        let undone = with_store_timeout(
            self.store_timeout,
            "delete_by_identifier",
            self.credential_repo.delete_by_identifier(identifier),
        )
        .await;
        if let Err(e) = undone {
            error!(identifier, "registration left without tokens: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn register(&self, request: RegisterInput) -> Result<LoginResult, AuthError> {
        let RegisterInput {
            identifier,
            display_name,
            password,
        } = request;

        let password_hash = self.credential_hasher.hash_password(&password).await?;

        let user_id = with_store_timeout(
            self.store_timeout,
            "create_user",
            self.credential_repo
                .create_user(&identifier, &display_name, &password_hash),
        )
        .await?;
        info!(%user_id, "user registered");

        let tokens = match self.token_service.issue_token_pair(&user_id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(%user_id, "token issue failed, undoing registration: {}", e);
                self.undo_registration(&identifier).await;
                return Err(e);
            }
        };

        Ok(LoginResult {
            user_id,
            display_name,
            tokens,
        })
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput {
            identifier,
            password,
        } = request;

        let rec = with_store_timeout(
            self.store_timeout,
            "find_by_identifier",
            self.credential_repo.find_by_identifier(&identifier),
        )
        .await?;
        let Some(rec) = rec else {
            self.verify_against_dummy(&password).await;
            return Err(AuthError::InvalidCredentials);
        };

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await;
        if !ok {
            debug!(user_id = %rec.user_id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.token_service.issue_token_pair(&rec.user_id).await?;

        Ok(LoginResult {
            user_id: rec.user_id,
            display_name: rec.display_name,
            tokens,
        })
    }
}
