//! Database access layer
//!
//! Pool construction, schema initialization, and queries for the items
//! table. The pool is built once at startup and carried in `AppState`;
//! every query function takes it as an explicit parameter.

pub mod items;

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Connect to the configured database and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!("Connecting to database: {}", config.url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create the items table if it does not exist yet.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
