//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String, max_connections: u32 },
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Reads the process environment (after loading `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let static_dir = PathBuf::from(
            lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "postgres".to_string());
        let storage = match backend.trim().to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" => {
                // Database URL must be provided (no default) for safety.
                let database_url = lookup("DATABASE_URL")
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=postgres"))?;
                let max_connections = match lookup("DB_MAX_CONNECTIONS") {
                    Some(v) => v
                        .parse::<u32>()
                        .context("DB_MAX_CONNECTIONS must be a valid u32")?
                        .max(1),
                    None => DEFAULT_DB_MAX_CONNECTIONS,
                };
                StorageBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            other => {
                return Err(anyhow!(
                    "STORAGE_BACKEND must be 'postgres' or 'memory' (got '{}')",
                    other
                ))
            }
        };

        Ok(Self {
            bind_addr,
            static_dir,
            storage,
        })
    }
}
