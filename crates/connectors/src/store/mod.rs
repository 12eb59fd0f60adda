use crate::error::StoreError;
use async_trait::async_trait;
use model::{CustomFilter, FilterId, NewCustomFilter};

pub mod http;
pub mod memory;

/// Persistence for saved custom filters.
#[async_trait]
pub trait FilterStore: Send + Sync {
    async fn get_filter(&self, id: &FilterId) -> Result<CustomFilter, StoreError>;
    async fn list_filters(&self) -> Result<Vec<CustomFilter>, StoreError>;
    /// Stores `filter` and returns the id assigned to it.
    async fn save_filter(&self, filter: &NewCustomFilter) -> Result<FilterId, StoreError>;
    async fn delete_filter(&self, id: &FilterId) -> Result<(), StoreError>;
}
