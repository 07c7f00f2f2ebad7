//! View repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::ViewRow;

/// Get a saved view by id
pub async fn get_view(pool: &SqlitePool, id: i64) -> Result<Option<ViewRow>, SqliteError> {
    let row = sqlx::query_as::<_, ViewRow>(
        "SELECT id, name, filters, exclude FROM views WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
