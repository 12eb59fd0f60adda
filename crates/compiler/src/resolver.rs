use crate::error::CompileError;
use connectors::FilterStore;
use model::{CustomFilter, FilterId};
use std::sync::Arc;
use tracing::debug;

/// Chain of saved filter ids currently being expanded, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail(Vec<FilterId>);

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &FilterId) -> bool {
        self.0.contains(id)
    }

    /// A new trail with `id` appended.
    pub fn extended(&self, id: &FilterId) -> Trail {
        let mut ids = self.0.clone();
        ids.push(id.clone());
        Trail(ids)
    }

    pub fn ids(&self) -> &[FilterId] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Loads saved filters referenced from a pipeline, refusing references that
/// would re-enter a filter already being expanded.
#[derive(Clone)]
pub struct CustomFilterResolver {
    store: Arc<dyn FilterStore>,
}

impl CustomFilterResolver {
    pub fn new(store: Arc<dyn FilterStore>) -> Self {
        Self { store }
    }

    /// Fetches `id` unless it is already on `trail`.
    pub async fn fetch(&self, id: &FilterId, trail: &Trail) -> Result<CustomFilter, CompileError> {
        if trail.contains(id) {
            let mut chain = trail.ids().to_vec();
            chain.push(id.clone());
            return Err(CompileError::CyclicReference { chain });
        }

        debug!("Resolving custom filter {} at depth {}", id, trail.depth());
        self.store
            .get_filter(id)
            .await
            .map_err(|source| CompileError::Fetch {
                id: id.clone(),
                source,
            })
    }
}
