//! Water leakage reporting API
//!
//! Citizens submit reports about leaks and water quality problems;
//! administrators triage them, and owners are emailed when the status of
//! their report changes.

pub mod authz;
pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod notifier;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub use state::AppState;

/// Schema migrations embedded at build time
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))
}

/// Install the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Setting default subscriber failed: {}", e))
}
