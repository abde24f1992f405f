use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub registration: RegistrationConfig,
    pub admin: AdminConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistrationConfig {
    /// Minimum age of a registration, in seconds, before it can be withdrawn.
    pub unregister_cooldown_secs: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    pub user_uuids: Vec<Uuid>,
}

impl AdminConfig {
    pub fn is_admin(&self, user_uuid: &Uuid) -> bool {
        self.user_uuids.contains(user_uuid)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub rust_log: String,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_COOLDOWN_SECS: i64 = 300;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: StorageBackend = lookup("STORAGE_BACKEND")
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Postgres);

        let database_url = lookup("DATABASE_URL");
        if backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL is required for the postgres backend"));
        }

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let host = lookup("HOST").ok_or_else(|| anyhow!("HOST is not set"))?;
        let port: u16 = lookup("PORT")
            .ok_or_else(|| anyhow!("PORT is not set"))?
            .parse()
            .context("PORT")?;
        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let unregister_cooldown_secs = match lookup("UNREGISTER_COOLDOWN_SECS") {
            Some(v) => v.parse().context("UNREGISTER_COOLDOWN_SECS")?,
            None => DEFAULT_COOLDOWN_SECS,
        };
        if unregister_cooldown_secs < 0 {
            return Err(anyhow!("UNREGISTER_COOLDOWN_SECS must not be negative"));
        }

        let user_uuids = lookup("ADMIN_USER_UUIDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        Uuid::parse_str(s)
                            .with_context(|| format!("ADMIN_USER_UUIDS entry '{}'", s))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Config {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            storage: StorageConfig { backend },
            registration: RegistrationConfig {
                unregister_cooldown_secs,
            },
            admin: AdminConfig { user_uuids },
            server: ServerConfig {
                port,
                host,
                rust_log,
                cors_allowed_origins,
            },
        })
    }
}
