//! Persistence gateway: pool acquisition, migrations and the transaction
//! primitive every multi-statement write goes through.

use std::{future::Future, pin::Pin};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::{
    config::DbConfig,
    error::{AppError, AppResult},
};

pub type Tx = Transaction<'static, Postgres>;

/// Future returned by a closure handed to [`run_atomic`].
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'c>>;

/// Connect to the database, retrying with a fixed backoff.
///
/// Only meant for process startup, when the database container may still be
/// booting. Fails once `connect_attempts` attempts have been spent.
pub async fn connect_with_retry(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let attempts = cfg.connect_attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match try_connect(cfg).await {
            Ok(pool) => {
                info!(attempt, "database connection established");
                return Ok(pool);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "database not reachable, retrying"
                );
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(cfg.connect_backoff).await;
                }
            }
        }
    }

    Err(last_err
        .map(anyhow::Error::from)
        .unwrap_or_else(|| anyhow::anyhow!("no connection attempt made")))
    .with_context(|| format!("connect to database after {attempts} attempts"))
}

async fn try_connect(cfg: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout)
        .connect(&cfg.database_url)
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}

/// Apply pending schema migrations from `./migrations`.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run database migrations")?;
    info!("database migrations applied");
    Ok(())
}

/// Run `op` inside a single transaction.
///
/// Commits when `op` returns `Ok`, rolls back when it returns `Err`. If the
/// future is dropped midway the transaction is dropped with it, which rolls
/// it back as well.
pub async fn run_atomic<T, F>(db: &PgPool, op: F) -> AppResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut Tx) -> TxFuture<'c, T> + Send,
{
    let mut tx = db.begin().await?;

    match op(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            debug!("transaction committed");
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                warn!(error = %rb, "rollback failed");
            }
            debug!(error = %e, "transaction rolled back");
            Err(e)
        }
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub fn is_check_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_check_violation())
}

/// Turn a unique-key violation into a conflict, pass everything else through.
pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(message.to_string())
    } else {
        AppError::DataStore(e)
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
pub fn like_contains(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
