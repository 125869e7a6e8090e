use std::sync::Arc;

use crate::{
    config::Config,
    db::CatalogStore,
    services::{ChatCompletionsProvider, CompletionProvider, Recommender},
};

/// Shared application state
///
/// Cheap to clone; everything inside is either immutable or swaps atomically.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogStore>, recommender: Recommender) -> Self {
        Self {
            catalog,
            recommender,
        }
    }

    /// Wires up the catalog store and LLM provider described by `config`
    ///
    /// The catalog is not read here; call `catalog.load()` during startup.
    pub fn from_config(config: &Config) -> Self {
        let catalog = Arc::new(CatalogStore::new(&config.data_path));
        let recommender = match ChatCompletionsProvider::from_config(config) {
            Some(provider) => Recommender::new(Arc::new(provider) as Arc<dyn CompletionProvider>),
            None => Recommender::disabled(),
        };

        Self::new(catalog, recommender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_key_disables_recommender() {
        let config = Config::from_vars(vec![(
            "DATA_PATH".to_string(),
            "/tmp/does-not-matter.json".to_string(),
        )])
        .unwrap();

        let state = AppState::from_config(&config);
        assert!(!state.recommender.is_configured());
        assert_eq!(
            state.catalog.path(),
            std::path::Path::new("/tmp/does-not-matter.json")
        );
    }

    #[test]
    fn test_from_config_with_key_enables_recommender() {
        let config = Config::from_vars(vec![(
            "GROQ_API_KEY".to_string(),
            "gsk_test".to_string(),
        )])
        .unwrap();

        let state = AppState::from_config(&config);
        assert!(state.recommender.is_configured());
    }
}
