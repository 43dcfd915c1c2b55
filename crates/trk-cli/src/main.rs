use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use trk_db::DeleteOutcome;
use trk_schemas::{datetime::parse_flexible, TrackingFilter};

#[derive(Parser)]
#[command(name = "trk")]
#[command(about = "Order tracking store CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Inspect and maintain tracking records
    Tracking {
        #[command(subcommand)]
        cmd: TrackingCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,

    /// Apply SQL migrations and seed the order counter.
    Migrate,
}

#[derive(Subcommand)]
enum TrackingCmd {
    /// Print matching records, one JSON object per line
    List {
        /// Exact client name
        #[arg(long)]
        client: Option<String>,

        /// Inclusive lower bound on shipping date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<DateTime<Utc>>,

        /// Inclusive upper bound on shipping date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<DateTime<Utc>>,
    },

    /// Print one record as pretty JSON
    Show {
        /// Order number (e.g. ORD001)
        order_number: String,
    },

    /// Delete one record. Missing records are reported, not an error.
    Delete {
        /// Order number (e.g. ORD001)
        order_number: String,
    },
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    parse_flexible(s)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { cmd } => {
            let pool = trk_db::connect_from_env().await?;
            match cmd {
                DbCmd::Status => {
                    let s = trk_db::status(&pool).await?;
                    println!("db_ok={} has_tracking_table={}", s.ok, s.has_tracking_table);
                }
                DbCmd::Migrate => {
                    trk_db::migrate(&pool).await?;
                    println!("migrations_applied=true");
                }
            }
            pool.close().await;
        }

        Commands::Tracking { cmd } => {
            let pool = open_migrated().await?;
            match cmd {
                TrackingCmd::List { client, start, end } => {
                    let filter = TrackingFilter {
                        client_name: client,
                        start_date: start,
                        end_date: end,
                    };
                    for record in trk_db::list_tracking(&pool, &filter).await? {
                        println!("{}", serde_json::to_string(&record)?);
                    }
                }
                TrackingCmd::Show { order_number } => {
                    let record = trk_db::get_tracking(&pool, &order_number)
                        .await?
                        .with_context(|| format!("not found: {order_number}"))?;
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                TrackingCmd::Delete { order_number } => {
                    match trk_db::delete_tracking(&pool, &order_number).await? {
                        DeleteOutcome::Deleted => {
                            tracing::info!(order_number = %order_number, "tracking/delete");
                            println!("deleted={order_number}");
                        }
                        DeleteOutcome::NotFound => println!("not_found={order_number}"),
                    }
                }
            }
            pool.close().await;
        }
    }

    Ok(())
}

/// Open the configured database without creating or migrating it. Schema
/// changes stay behind the explicit `trk db migrate`.
async fn open_migrated() -> Result<SqlitePool> {
    const HINT: &str = "run `trk db migrate` first";

    let pool = trk_db::connect_existing_from_env()
        .await
        .context(HINT)?;

    let s = trk_db::status(&pool).await?;
    if !s.has_tracking_table {
        pool.close().await;
        anyhow::bail!("database has no tracking table; {HINT}");
    }
    Ok(pool)
}
