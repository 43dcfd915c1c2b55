//! Shared runtime state for trk-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The connection pool is
//! the only shared resource; there is no other process-wide mutable state.

use serde::Serialize;
use sqlx::SqlitePool;

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Migrated SQLite pool.
    pub pool: SqlitePool,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            build: BuildInfo {
                service: "trk-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}
