//! View repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::ViewRow;

/// Get a saved view by id
pub async fn get_view(pool: &PgPool, id: i64) -> Result<Option<ViewRow>, PostgresError> {
    let row = sqlx::query_as::<_, ViewRow>(
        "SELECT id, name, filters::TEXT, exclude::TEXT FROM views WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
