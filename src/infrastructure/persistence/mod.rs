//! SQLite persistence.
//!
//! - [`SqliteLinkRepository`] - Link storage and retrieval
//! - [`open_database`] - Pool setup followed by schema migrations
//! - [`connect_pool`] / [`run_migrations`] - The two steps on their own

pub mod sqlite_link_repository;

pub use sqlite_link_repository::SqliteLinkRepository;

use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Opens a SQLite connection pool, creating the database file if missing.
///
/// Connections are never recycled for idleness, which keeps `sqlite::memory:`
/// databases alive for the lifetime of the pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the URL is malformed or the database cannot be opened.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Applies the embedded migrations in `./migrations`.
///
/// # Errors
///
/// Returns [`MigrateError`] if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Opens the pool and brings the schema up to date.
///
/// Every entry point that touches links goes through here, so a fresh
/// `DATABASE_URL` is usable without a separate migration step.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn open_database(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let pool = connect_pool(database_url, max_connections)
        .await
        .context("Failed to open database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
