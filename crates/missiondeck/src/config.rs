//! Catalog session configuration with sensible defaults.
//!
//! [`CatalogConfig`] gathers what every frontend needs to start a session:
//! where the catalog document lives, where favorites are stored, and the
//! timing of the search debounce and contact submission. Binaries map their
//! command-line flags onto it; [`CatalogConfig::open`] turns it into a ready
//! [`CatalogState`].

use std::path::PathBuf;
use std::time::Duration;

use crate::contact::DEFAULT_SUBMIT_DELAY;
use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::favorites::{FAVORITES_KEY, Favorites};
use crate::loader::{DataSource, FallbackPolicy, load_missions};
use crate::state::CatalogState;
use crate::storage::JsonFileStore;

/// Configuration for a catalog session.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog document. Default: `missions.json`.
    pub data_source: DataSource,
    /// What to start with if the document cannot be loaded. Default: empty.
    pub fallback: FallbackPolicy,
    /// File backing the local key-value store. Default: `missiondeck-storage.json`.
    pub storage_path: PathBuf,
    /// Key under which favorites are stored. Default: `missionFavorites`.
    pub favorites_key: String,
    /// Delay after the last keystroke before re-filtering. Default: 300 ms.
    pub search_debounce: Duration,
    /// Simulated contact submission delay. Default: 2 s.
    pub submit_delay: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::File(PathBuf::from("missions.json")),
            fallback: FallbackPolicy::Empty,
            storage_path: PathBuf::from("missiondeck-storage.json"),
            favorites_key: FAVORITES_KEY.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            submit_delay: DEFAULT_SUBMIT_DELAY,
        }
    }
}

impl CatalogConfig {
    pub fn new(data_source: DataSource) -> Self {
        Self {
            data_source,
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_favorites_key(mut self, key: impl Into<String>) -> Self {
        self.favorites_key = key.into();
        self
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Load favorites from the configured store.
    pub fn load_favorites(&self) -> Favorites {
        Favorites::load(
            Box::new(JsonFileStore::new(&self.storage_path)),
            self.favorites_key.clone(),
        )
    }

    /// Load the catalog and favorites into a new session.
    pub async fn open(&self) -> CatalogState {
        let outcome = load_missions(&self.data_source, self.fallback).await;
        CatalogState::from_outcome(outcome, self.load_favorites())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CatalogConfig::default();
        assert_eq!(
            config.data_source,
            DataSource::File(PathBuf::from("missions.json"))
        );
        assert_eq!(config.fallback, FallbackPolicy::Empty);
        assert_eq!(config.favorites_key, "missionFavorites");
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.submit_delay, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn open_combines_catalog_and_stored_favorites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage.json");
        std::fs::write(&storage, r#"{"missionFavorites":"[2]"}"#).unwrap();

        let config = CatalogConfig::new(DataSource::File(dir.path().join("absent.json")))
            .with_fallback(FallbackPolicy::Samples)
            .with_storage_path(&storage);
        let mut state = config.open().await;

        assert_eq!(state.missions().len(), 5);
        assert!(state.load_notice().is_some());
        assert!(state.favorites().contains(2));

        state.toggle_favorite(5).unwrap();
        let reloaded = config.load_favorites();
        assert_eq!(reloaded.ids(), &[2, 5]);
    }
}
