use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::AppResult,
    models::{PickSource, Recommendation, Show},
    services::{
        providers::{build_generator, TextGenerator},
        AssistLimits, Catalog, PersistedStore, Selector,
    },
};

/// Counters exposed through the debug hooks
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PickStats {
    pub served: u64,
    pub random: u64,
    pub assisted: u64,
    pub fallbacks: u64,
    /// Recommend actions that found no candidates
    pub empty: u64,
}

impl PickStats {
    pub fn record(&mut self, recommendation: &Recommendation) {
        self.served += 1;
        if recommendation.show.is_none() {
            self.empty += 1;
            return;
        }
        match recommendation.source {
            PickSource::Random => self.random += 1,
            PickSource::Assisted { .. } => self.assisted += 1,
            PickSource::Fallback { .. } => self.fallbacks += 1,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub config: Arc<Config>,
    pub store: PersistedStore,
    pub selector: Selector,
}

/// Inner state that can be modified
#[derive(Default)]
pub struct AppStateInner {
    /// Collection pushed by the main application; wins over the persisted blob
    pub shared_shows: Option<Vec<Show>>,
    pub stats: PickStats,
}

impl AppState {
    /// Creates state with the generator selected in `config`
    pub fn new(config: Config) -> Self {
        let generator = build_generator(&config);
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        let store = PersistedStore::new(&config.data_dir);
        let selector = Selector::new(generator, AssistLimits::from(&config));
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            config: Arc::new(config),
            store,
            selector,
        }
    }

    /// Loads the catalog for one page load or API call
    pub async fn catalog(&self) -> AppResult<Catalog> {
        let shared = self.inner.read().await.shared_shows.clone();
        Catalog::load(shared.as_deref(), &self.store).await
    }

    pub async fn record(&self, recommendation: &Recommendation) {
        self.inner.write().await.stats.record(recommendation);
    }

    pub async fn stats(&self) -> PickStats {
        self.inner.read().await.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FallbackReason;

    #[test]
    fn test_pick_stats_record() {
        let show = Show::new("Heat", "movie", "completed");
        let mut stats = PickStats::default();

        stats.record(&Recommendation::random(Some(show.clone())));
        stats.record(&Recommendation::fallback(Some(show.clone()), FallbackReason::Timeout));
        stats.record(&Recommendation {
            show: Some(show),
            source: PickSource::Assisted { reason: None },
        });
        stats.record(&Recommendation::random(None));

        assert_eq!(
            stats,
            PickStats {
                served: 4,
                random: 1,
                assisted: 1,
                fallbacks: 1,
                empty: 1,
            }
        );
    }
}
