//! InventoryRepository trait implementation for PostgreSQL

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::InventoryRepository;
use crate::data::types::{Resource, View};
use crate::domain::export::CompiledQuery;

use super::PostgresService;
use super::repositories::{resources, views};

#[async_trait]
impl InventoryRepository for Arc<PostgresService> {
    async fn get_view(&self, id: i64) -> Result<Option<View>, DataError> {
        views::get_view(self.pool(), id)
            .await?
            .map(View::from_row)
            .transpose()
    }

    async fn fetch_resources(&self, query: &CompiledQuery) -> Result<Vec<Resource>, DataError> {
        resources::fetch_rows(self.pool(), query)
            .await?
            .into_iter()
            .map(Resource::from_row)
            .collect()
    }
}
