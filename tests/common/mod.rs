//! Shared wiring for integration tests
#![allow(dead_code)]

use parley::app::App;
use parley::application_impl::Argon2CredentialHasher;
use parley::application_port::{AuthError, CredentialHasher};
use parley::domain_model::{RefreshTokenRecord, SigningSecret};
use parley::domain_port::RefreshTokenRepo;
use parley::infra_memory::{MemoryCredentialRepo, MemoryRefreshTokenRepo};
use parley::settings::Hasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const TEST_SECRET: &str = "integration-test-signing-secret";

pub fn secret() -> SigningSecret {
    SigningSecret::new(TEST_SECRET).unwrap()
}

pub fn cheap_hasher() -> Arc<Argon2CredentialHasher> {
    Arc::new(
        Argon2CredentialHasher::from_settings(&Hasher {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap(),
    )
}

/// App over in-memory stores; the refresh repo handle is returned so tests
/// can seed or inspect records directly.
pub fn memory_app() -> (App, MemoryRefreshTokenRepo) {
    let refresh_repo = MemoryRefreshTokenRepo::new();
    let app = App::from_parts(
        secret(),
        cheap_hasher(),
        Arc::new(MemoryCredentialRepo::new()),
        Arc::new(refresh_repo.clone()),
        Duration::from_millis(500),
    );
    (app, refresh_repo)
}

/// Refresh store that never answers in time.
#[derive(Default, Clone)]
pub struct StalledRefreshTokenRepo;

#[async_trait::async_trait]
impl RefreshTokenRepo for StalledRefreshTokenRepo {
    async fn insert(&self, _record: &RefreshTokenRecord) -> Result<(), AuthError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn mark_revoked(&self, _token: &str) -> Result<bool, AuthError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(false)
    }
}

/// Refresh store whose backend is down.
#[derive(Default, Clone)]
pub struct BrokenRefreshTokenRepo;

#[async_trait::async_trait]
impl RefreshTokenRepo for BrokenRefreshTokenRepo {
    async fn insert(&self, _record: &RefreshTokenRecord) -> Result<(), AuthError> {
        Err(AuthError::StoreUnavailable("connection refused".to_string()))
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Err(AuthError::StoreUnavailable("connection refused".to_string()))
    }

    async fn mark_revoked(&self, _token: &str) -> Result<bool, AuthError> {
        Err(AuthError::StoreUnavailable("connection refused".to_string()))
    }
}

pub fn app_with_refresh_repo(repo: Arc<dyn RefreshTokenRepo>, timeout: Duration) -> App {
    App::from_parts(
        secret(),
        cheap_hasher(),
        Arc::new(MemoryCredentialRepo::new()),
        repo,
        timeout,
    )
}

/// Refresh store whose first `failures` inserts report the backend as down.
#[derive(Clone)]
pub struct FlakyRefreshTokenRepo {
    inner: MemoryRefreshTokenRepo,
    failures: Arc<AtomicUsize>,
}

impl FlakyRefreshTokenRepo {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryRefreshTokenRepo::new(),
            failures: Arc::new(AtomicUsize::new(failures)),
        }
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepo for FlakyRefreshTokenRepo {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AuthError> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AuthError::StoreUnavailable("connection reset".to_string()));
        }
        self.inner.insert(record).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        self.inner.find_by_token(token).await
    }

    async fn mark_revoked(&self, token: &str) -> Result<bool, AuthError> {
        self.inner.mark_revoked(token).await
    }
}

/// Counts hash checks on top of the cheap Argon2 hasher.
pub struct CountingHasher {
    inner: Argon2CredentialHasher,
    pub verifies: AtomicUsize,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self {
            inner: Argon2CredentialHasher::from_settings(&Hasher {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
            verifies: AtomicUsize::new(0),
        }
    }

    pub fn verify_count(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CredentialHasher for CountingHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        self.inner.hash_password(password).await
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_password(password, password_hash).await
    }
}
