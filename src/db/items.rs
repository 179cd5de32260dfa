//! Items table queries
//!
//! Read-only access to the `items` table. The table itself is populated
//! out of band (seed scripts, admin tooling); this service only reads.

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};

/// One row of the items table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

/// List all items ordered by id.
pub async fn list_items(db: &Pool<Sqlite>) -> AppResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>("SELECT id, name FROM items ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(items)
}

/// Fetch a single item by id, or None when no row matches.
pub async fn get_item(db: &Pool<Sqlite>, id: i64) -> AppResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>("SELECT id, name FROM items WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(item)
}
