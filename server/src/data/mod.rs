//! Data storage layer
//!
//! - `sqlite` - embedded backend (default)
//! - `postgres` - shared backend
//! - `sql` - dialect abstraction used to compile export queries
//! - `types` - row types shared by both backends
//! - `traits` - backend-agnostic repository interface
//! - `error` - unified error type for both backends

pub mod error;
pub mod postgres;
pub mod sql;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;
pub use traits::InventoryRepository;

use std::sync::Arc;

use crate::core::config::{DatabaseBackend, DatabaseConfig};
use sql::Backend;

/// Database service enum
///
/// Wraps the backend-specific service selected at startup. Services are
/// stored as Arc so repositories can be handed out cheaply per request.
pub enum DatabaseService {
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend
    Postgres(Arc<PostgresService>),
}

impl DatabaseService {
    /// Initialize the database service based on configuration
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.backend {
            DatabaseBackend::Sqlite => {
                let service = SqliteService::init(&config.sqlite_path).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            DatabaseBackend::Postgres => {
                let pg = config.postgres.as_ref().ok_or_else(|| {
                    DataError::Config("PostgreSQL configuration required".to_string())
                })?;
                let service = PostgresService::init(pg).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }

    /// SQL backend, which selects the dialect export queries are compiled for
    pub fn backend(&self) -> Backend {
        match self {
            Self::Sqlite(_) => Backend::Sqlite,
            Self::Postgres(_) => Backend::Postgres,
        }
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn InventoryRepository> {
        match self {
            Self::Sqlite(s) => Box::new(Arc::clone(s)),
            Self::Postgres(p) => Box::new(Arc::clone(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_sqlite_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            sqlite_path: dir.path().join("inventory.db"),
            postgres: None,
        };
        let service = DatabaseService::init(&config).await.unwrap();
        assert_eq!(service.backend(), Backend::Sqlite);
        assert!(service.repository().get_view(1).await.unwrap().is_none());
        service.close().await;
    }

    #[tokio::test]
    async fn test_init_postgres_requires_config() {
        let config = DatabaseConfig {
            backend: DatabaseBackend::Postgres,
            sqlite_path: "unused.db".into(),
            postgres: None,
        };
        let result = DatabaseService::init(&config).await;
        assert!(matches!(result, Err(DataError::Config(_))));
    }
}
