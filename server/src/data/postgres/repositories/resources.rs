//! Resource repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::ResourceRow;
use crate::domain::export::{CompiledQuery, SqlValue};

/// Execute a compiled export statement, binding its values in order
///
/// Values are bound with their native types so `$n` placeholders compare
/// against `DOUBLE PRECISION` and `BIGINT` columns without casts.
pub async fn fetch_rows(
    pool: &PgPool,
    query: &CompiledQuery,
) -> Result<Vec<ResourceRow>, PostgresError> {
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
