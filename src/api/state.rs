use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{CatalogItem, FeedbackRecord};
use crate::services::{merge_catalogs, MoodTaxonomy};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    /// Built once at startup, never mutated
    pub taxonomy: Arc<MoodTaxonomy>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub catalog: Vec<CatalogItem>,
    pub feedback: Vec<FeedbackRecord>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new empty application state
    pub fn new() -> Self {
        Self::with_catalog(Vec::new())
    }

    /// Creates state seeded with a catalog
    pub fn with_catalog(catalog: Vec<CatalogItem>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                catalog: merge_catalogs([catalog]),
                feedback: Vec::new(),
            })),
            taxonomy: Arc::new(MoodTaxonomy::standard()),
        }
    }
}

impl AppStateInner {
    /// Merges new items into the catalog, returning how many ids were new
    pub fn merge_items(&mut self, items: Vec<CatalogItem>) -> usize {
        let before = self.catalog.len();
        let existing = std::mem::take(&mut self.catalog);
        self.catalog = merge_catalogs([existing, items]);
        self.catalog.len() - before
    }

    /// Writes recommendation stamps back into the catalog
    pub fn record_recommended<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        for recommended in items {
            if let Some(entry) = self.catalog.iter_mut().find(|c| c.id == recommended.id) {
                entry.last_recommended_at = recommended.last_recommended_at;
            }
        }
    }
}
