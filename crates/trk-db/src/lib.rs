//! SQLite persistence for tracking records.
//!
//! Layout:
//! - [`mapper`]: record <-> column set conversions
//! - [`query`]: read-only access (list with filter, get by order number)
//! - [`command`]: create / merge-update / delete
//! - [`order_number`]: `ORD###` scheme and the atomic counter table
//!
//! All functions take a `&SqlitePool` and return `anyhow::Result`; absence of
//! a record is a value (`Option`, `UpdateOutcome`, `DeleteOutcome`), never an
//! error.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod command;
pub mod mapper;
pub mod order_number;
pub mod query;

pub use command::{
    apply_patch, create_tracking, delete_tracking, update_tracking, DeleteOutcome, UpdateOutcome,
};
pub use query::{get_tracking, list_tracking};

pub const ENV_DB_URL: &str = "TRK_DATABASE_URL";
pub const DEFAULT_DB_URL: &str = "sqlite://tracking.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Open a pool on `url`, creating the database file if it does not exist.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url: {url}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open SQLite database at {url}"))?;

    Ok(pool)
}

/// Connect using TRK_DATABASE_URL, falling back to [`DEFAULT_DB_URL`].
pub async fn connect_from_env() -> Result<SqlitePool> {
    connect(&url_from_env(), DEFAULT_MAX_CONNECTIONS).await
}

/// Like [`connect_from_env`], but never creates the database file.
pub async fn connect_existing_from_env() -> Result<SqlitePool> {
    let url = url_from_env();
    let options = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("invalid database url: {url}"))?
        .create_if_missing(false);

    SqlitePoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open existing SQLite database at {url}"))
}

fn url_from_env() -> String {
    std::env::var(ENV_DB_URL).unwrap_or_else(|_| DEFAULT_DB_URL.to_string())
}

/// Fresh, migrated in-memory database.
///
/// Each SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .context("invalid in-memory database url")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory SQLite database")?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Run embedded SQLx migrations, then seed the order counter from any
/// existing rows. Safe to call repeatedly.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;

    order_number::seed_order_counter(pool).await?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &SqlitePool) -> Result<DbStatus> {
    let (one,): (i64,) = sqlx::query_as::<_, (i64,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (tables,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        select count(*)
        from sqlite_master
        where type = 'table' and name = 'tracking'
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_tracking_table: tables > 0,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_tracking_table: bool,
}
