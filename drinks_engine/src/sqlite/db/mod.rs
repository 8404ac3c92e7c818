//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool,
//! or create an atomic transaction as the need arises and call through to the functions without any other changes.
use log::{debug, info};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Error as SqlxError, Sqlite, SqlitePool};

pub mod drinks;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Creates the SQLite database file at `url` if it does not exist yet. In-memory databases always "exist".
pub async fn create_database_if_missing(url: &str) -> Result<(), SqlxError> {
    if Sqlite::database_exists(url).await? {
        debug!("🗃️ Database {url} already exists");
        return Ok(());
    }
    Sqlite::create_database(url).await?;
    info!("🗃️ Created Sqlite database {url}");
    Ok(())
}
