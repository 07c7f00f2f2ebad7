//! PostgreSQL migration management

use sqlx::PgPool;

use super::error::PostgresError;
use super::schema::{SCHEMA, SCHEMA_VERSION};

/// Run all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), PostgresError> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = 'schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    let current_version: Option<i32> = if table_exists {
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
    } else {
        None
    };

    match current_version {
        Some(v) if v >= SCHEMA_VERSION => {
            if v > SCHEMA_VERSION {
                tracing::warn!(
                    "PostgreSQL schema version {} is newer than application version {}",
                    v,
                    SCHEMA_VERSION
                );
            }
            tracing::debug!("PostgreSQL schema is up to date (v{})", v);
            Ok(())
        }
        _ => {
            tracing::debug!("Applying PostgreSQL schema v{}", SCHEMA_VERSION);
            apply_schema(pool).await
        }
    }
}

async fn apply_schema(pool: &PgPool) -> Result<(), PostgresError> {
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(SCHEMA).execute(&mut *tx).await?;

    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at) VALUES (1, $1, $2) \
         ON CONFLICT (id) DO UPDATE SET version = EXCLUDED.version, applied_at = EXCLUDED.applied_at",
    )
    .bind(SCHEMA_VERSION)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
