use crate::{error::StoreError, store::FilterStore};
use async_trait::async_trait;
use model::{CustomFilter, FilterId, NewCustomFilter};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local filter store with the same rules as the HTTP service:
/// labels are unique and unknown ids are reported as not found.
#[derive(Debug, Default)]
pub struct InMemoryFilterStore {
    filters: RwLock<HashMap<FilterId, CustomFilter>>,
}

impl InMemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `filters`, keyed by their own ids.
    pub fn with_filters(filters: impl IntoIterator<Item = CustomFilter>) -> Self {
        let filters = filters
            .into_iter()
            .map(|filter| (filter.id.clone(), filter))
            .collect();
        Self {
            filters: RwLock::new(filters),
        }
    }

    pub async fn len(&self) -> usize {
        self.filters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.filters.read().await.is_empty()
    }
}

#[async_trait]
impl FilterStore for InMemoryFilterStore {
    async fn get_filter(&self, id: &FilterId) -> Result<CustomFilter, StoreError> {
        self.filters
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list_filters(&self) -> Result<Vec<CustomFilter>, StoreError> {
        let mut filters: Vec<_> = self.filters.read().await.values().cloned().collect();
        filters.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(filters)
    }

    async fn save_filter(&self, filter: &NewCustomFilter) -> Result<FilterId, StoreError> {
        let mut filters = self.filters.write().await;

        if filters.values().any(|f| f.label == filter.label) {
            return Err(StoreError::DuplicateLabel(filter.label.clone()));
        }

        let id = FilterId::new(uuid::Uuid::new_v4().simple().to_string());
        filters.insert(id.clone(), filter.clone().into_saved(id.clone()));
        debug!("Stored custom filter '{}' as {}", filter.label, id);
        Ok(id)
    }

    async fn delete_filter(&self, id: &FilterId) -> Result<(), StoreError> {
        self.filters
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{OperatorCode, Pipeline, Step};

    fn bright() -> NewCustomFilter {
        let pipeline = Pipeline::new().push_step(
            Step::range("rb-1", "rb")
                .with_operator(OperatorCode::Gt)
                .with_literal("0.5"),
        );
        NewCustomFilter::from_pipeline("bright", &pipeline).unwrap()
    }

    #[tokio::test]
    async fn test_save_get_delete() {
        let store = InMemoryFilterStore::new();
        let id = store.save_filter(&bright()).await.unwrap();

        let saved = store.get_filter(&id).await.unwrap();
        assert_eq!(saved.label, "bright");
        assert_eq!(saved.description.as_deref(), Some("Filter with 1 conditions"));
        assert!(saved.is_boolean);

        store.delete_filter(&id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(
            store.get_filter(&id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_filter(&id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_labels_are_rejected() {
        let store = InMemoryFilterStore::new();
        store.save_filter(&bright()).await.unwrap();

        let err = store.save_filter(&bright()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLabel(label) if label == "bright"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_label() {
        let mut second = bright();
        second.label = "another".into();

        let store = InMemoryFilterStore::new();
        store.save_filter(&bright()).await.unwrap();
        store.save_filter(&second).await.unwrap();

        let labels: Vec<_> = store
            .list_filters()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.label)
            .collect();
        assert_eq!(labels, vec!["another", "bright"]);
    }
}
