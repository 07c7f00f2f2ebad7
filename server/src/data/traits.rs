//! Repository traits for database backends
//!
//! Defines the backend-agnostic interface the export handlers use. SQLite and
//! PostgreSQL each implement it on their `Arc<..Service>`.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{Resource, View};
use crate::domain::export::CompiledQuery;

/// Read-only access to resources and saved views
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Load a saved view by id
    async fn get_view(&self, id: i64) -> Result<Option<View>, DataError>;

    /// Run a compiled export statement and materialize its rows, in
    /// statement order
    async fn fetch_resources(&self, query: &CompiledQuery) -> Result<Vec<Resource>, DataError>;
}
