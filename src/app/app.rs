use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::SigningSecret;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::{Settings, StoreBackend};
use anyhow::anyhow;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Wired services for one process.
pub struct App {
    pub auth_service: Arc<dyn AuthService>,
    pub token_service: Arc<dyn TokenService>,
    pub credential_hasher: Arc<dyn CredentialHasher>,
    pool: Option<MySqlPool>,
}

impl App {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let secret = SigningSecret::from_env(&settings.auth.secret_env)?;
        let credential_hasher: Arc<dyn CredentialHasher> =
            Arc::new(Argon2CredentialHasher::from_settings(&settings.hasher)?);
        let store_timeout = settings.store.timeout();

        let (credential_repo, refresh_repo, pool): (
            Arc<dyn CredentialRepo>,
            Arc<dyn RefreshTokenRepo>,
            Option<MySqlPool>,
        ) = match settings.store.backend {
            StoreBackend::Memory => {
                warn!("memory store backend: refresh tokens do not outlive this process");
                (
                    Arc::new(MemoryCredentialRepo::new()),
                    Arc::new(MemoryRefreshTokenRepo::new()),
                    None,
                )
            }
            StoreBackend::Mysql => {
                let dsn = settings
                    .store
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow!("store.dsn is required for the mysql backend"))?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.store.max_connections)
                    .acquire_timeout(store_timeout)
                    .connect(dsn)
                    .await?;
                (
                    Arc::new(MySqlCredentialRepo::new(pool.clone())),
                    Arc::new(MySqlRefreshTokenRepo::new(pool.clone())),
                    Some(pool),
                )
            }
        };

        let mut app = Self::from_parts(
            secret,
            credential_hasher,
            credential_repo,
            refresh_repo,
            store_timeout,
        );
        app.pool = pool;

        info!(backend = ?settings.store.backend, "auth services ready");
        Ok(app)
    }

    pub fn from_parts(
        secret: SigningSecret,
        credential_hasher: Arc<dyn CredentialHasher>,
        credential_repo: Arc<dyn CredentialRepo>,
        refresh_repo: Arc<dyn RefreshTokenRepo>,
        store_timeout: Duration,
    ) -> Self {
        let token_service: Arc<dyn TokenService> =
            Arc::new(RealTokenService::new(secret, refresh_repo, store_timeout));
        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            credential_repo,
            credential_hasher.clone(),
            token_service.clone(),
            store_timeout,
        ));

        Self {
            auth_service,
            token_service,
            credential_hasher,
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("store pool closed");
        }
    }
}
