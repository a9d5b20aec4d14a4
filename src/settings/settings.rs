use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub hasher: Hasher,
    pub store: Store,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Name of the environment variable holding the signing secret. The
    /// secret itself never goes through the settings file.
    pub secret_env: String,
}

/// Argon2id cost for newly created hashes.
#[derive(Debug, Clone, Deserialize)]
pub struct Hasher {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Mysql,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: StoreBackend,
    pub dsn: Option<String>,
    pub timeout_ms: u64,
    pub max_connections: u32,
}

impl Store {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Reads the TOML file, then lets `PARLEY__SECTION__KEY` environment
/// variables override single values (e.g. `PARLEY__STORE__DSN`).
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix("PARLEY")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
