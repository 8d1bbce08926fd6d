use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, ItemId},
};

/// Source of catalog items (a media server library, a trending list, a file)
///
/// Providers only fetch; deduplication across providers happens in
/// [`merge_catalogs`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch every item this provider knows about
    async fn fetch_items(&self) -> AppResult<Vec<CatalogItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Provider backed by a fixed list, used for seeding and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn fetch_items(&self) -> AppResult<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// Provider reading a JSON array of catalog items from disk
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JsonFileCatalog {
    async fn fetch_items(&self) -> AppResult<Vec<CatalogItem>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let items: Vec<CatalogItem> = serde_json::from_str(&raw)?;
        tracing::info!(path = %self.path.display(), count = items.len(), "Loaded catalog file");
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

/// Merges item lists by id
///
/// The first occurrence of an id keeps its position and metadata; later
/// duplicates only contribute their platforms.
pub fn merge_catalogs<I>(sources: I) -> Vec<CatalogItem>
where
    I: IntoIterator<Item = Vec<CatalogItem>>,
{
    let mut merged: Vec<CatalogItem> = Vec::new();
    let mut positions: HashMap<ItemId, usize> = HashMap::new();

    for item in sources.into_iter().flatten() {
        match positions.get(&item.id) {
            Some(&index) => merged[index].platforms.extend(item.platforms),
            None => {
                positions.insert(item.id.clone(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

/// Fetches from every configured provider and merges the results
pub struct CatalogService {
    providers: Vec<Arc<dyn CatalogProvider>>,
}

impl CatalogService {
    pub fn new(providers: Vec<Arc<dyn CatalogProvider>>) -> Self {
        Self { providers }
    }

    /// Fetch all providers in parallel
    ///
    /// A failing provider is logged and skipped. The call only fails when
    /// every provider failed.
    pub async fn fetch_all(&self) -> AppResult<Vec<CatalogItem>> {
        let mut tasks = Vec::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            tasks.push(tokio::spawn(async move {
                let result = provider.fetch_items().await;
                (provider.name(), result)
            }));
        }

        let mut fetched = Vec::new();
        let mut errors = 0;

        for task in tasks {
            match task.await {
                Ok((_, Ok(items))) => fetched.push(items),
                Ok((name, Err(e))) => {
                    tracing::error!(provider = name, error = %e, "Catalog fetch failed");
                    errors += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    errors += 1;
                }
            }
        }

        if errors > 0 {
            tracing::warn!(
                success_count = fetched.len(),
                error_count = errors,
                "Partial catalog fetch failure"
            );
        }

        if fetched.is_empty() && errors > 0 {
            return Err(AppError::Catalog(
                "Failed to fetch any catalog data".to_string(),
            ));
        }

        Ok(merge_catalogs(fetched))
    }
}
