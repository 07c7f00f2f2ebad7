//! Resource repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::ResourceRow;
use crate::domain::export::{CompiledQuery, SqlValue};

/// Execute a compiled export statement, binding its values in order
pub async fn fetch_rows(
    pool: &SqlitePool,
    query: &CompiledQuery,
) -> Result<Vec<ResourceRow>, SqliteError> {
    let mut statement = sqlx::query_as::<_, ResourceRow>(&query.sql);
    for value in &query.params {
        statement = match value {
            SqlValue::Text(v) => statement.bind(v.as_str()),
            SqlValue::Float(v) => statement.bind(*v),
            SqlValue::Integer(v) => statement.bind(*v),
        };
    }

    let rows = statement.fetch_all(pool).await?;
    tracing::debug!(rows = rows.len(), "Fetched export rows");
    Ok(rows)
}
