//! Daemon configuration from environment variables.
//!
//! `main.rs` loads `.env.local` (if present) before calling
//! [`DaemonConfig::from_env`]; production injects env vars directly.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const ENV_DAEMON_ADDR: &str = "TRK_DAEMON_ADDR";
pub const ENV_DB_MAX_CONNECTIONS: &str = "TRK_DB_MAX_CONNECTIONS";

const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8080);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take defaults; set but
    /// unparseable keys are errors naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup(ENV_DAEMON_ADDR) {
            Some(v) => v
                .parse()
                .with_context(|| format!("{ENV_DAEMON_ADDR}: invalid socket address '{v}'"))?,
            None => SocketAddr::from(DEFAULT_ADDR),
        };

        let database_url =
            lookup(trk_db::ENV_DB_URL).unwrap_or_else(|| trk_db::DEFAULT_DB_URL.to_string());

        let max_connections = match lookup(ENV_DB_MAX_CONNECTIONS) {
            Some(v) => {
                let n: u32 = v.parse().with_context(|| {
                    format!("{ENV_DB_MAX_CONNECTIONS}: expected a positive integer, got '{v}'")
                })?;
                anyhow::ensure!(n > 0, "{ENV_DB_MAX_CONNECTIONS} must be > 0");
                n
            }
            None => trk_db::DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_addr,
            database_url,
            max_connections,
        })
    }
}
