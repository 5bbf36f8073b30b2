use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogSummary, RecommendationDefaults},
    services::{CatalogSource, RecommenderContext},
};

/// Shared application state
///
/// The current context is swapped whole on reload; handlers clone the inner
/// `Arc` and score against that snapshot without holding the lock.
#[derive(Clone)]
pub struct AppState {
    context: Arc<RwLock<Arc<RecommenderContext>>>,
    source: Arc<dyn CatalogSource>,
    defaults: RecommendationDefaults,
}

impl AppState {
    pub fn new(
        context: RecommenderContext,
        source: Arc<dyn CatalogSource>,
        defaults: RecommendationDefaults,
    ) -> Self {
        Self {
            context: Arc::new(RwLock::new(Arc::new(context))),
            source,
            defaults,
        }
    }

    /// Loads the catalog from `source` and builds the initial state
    pub async fn load(
        source: Arc<dyn CatalogSource>,
        defaults: RecommendationDefaults,
    ) -> AppResult<Self> {
        let context = build_context(source.clone()).await?;
        Ok(Self::new(context, source, defaults))
    }

    /// Context currently being served
    pub async fn snapshot(&self) -> Arc<RecommenderContext> {
        self.context.read().await.clone()
    }

    pub fn defaults(&self) -> RecommendationDefaults {
        self.defaults
    }

    /// Rebuilds the context from the catalog source and swaps it in
    ///
    /// On failure the previous context keeps serving.
    pub async fn reload(&self) -> AppResult<CatalogSummary> {
        let context = match build_context(self.source.clone()).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog reload failed, keeping current snapshot");
                return Err(e);
            }
        };

        let summary = context.summary();
        *self.context.write().await = Arc::new(context);
        tracing::info!(entries = summary.entries, "Catalog snapshot replaced");

        Ok(summary)
    }
}

async fn build_context(source: Arc<dyn CatalogSource>) -> AppResult<RecommenderContext> {
    tokio::task::spawn_blocking(move || RecommenderContext::from_source(source.as_ref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;
    use crate::services::catalog::MockCatalogSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut source = MockCatalogSource::new();
        source.expect_load().times(2).returning(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let mut entries = vec![CatalogEntry::new("Heat", "Crime", 1995, 5000, 8.3)];
            if n > 0 {
                entries.push(CatalogEntry::new("Alien", "Horror", 1979, 5000, 8.5));
            }
            Ok(entries)
        });
        source.expect_describe().returning(|| "mock".to_string());

        let state = AppState::load(Arc::new(source), RecommendationDefaults::default())
            .await
            .unwrap();
        let before = state.snapshot().await;
        assert_eq!(before.catalog().len(), 1);

        let summary = state.reload().await.unwrap();
        assert_eq!(summary.entries, 2);
        assert_eq!(state.snapshot().await.catalog().len(), 2);
        // earlier snapshot is untouched
        assert_eq!(before.catalog().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut source = MockCatalogSource::new();
        source.expect_load().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![CatalogEntry::new("Heat", "Crime", 1995, 5000, 8.3)])
            } else {
                Err(AppError::Catalog("source unavailable".to_string()))
            }
        });
        source.expect_describe().returning(|| "mock".to_string());

        let state = AppState::load(Arc::new(source), RecommendationDefaults::default())
            .await
            .unwrap();

        assert!(state.reload().await.is_err());
        assert_eq!(state.snapshot().await.catalog()[0].title, "Heat");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
