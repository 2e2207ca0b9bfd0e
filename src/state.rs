use crate::api::{create_generator, TitleGenerator};
use crate::config::AppConfig;
use std::sync::Arc;

/// Central application state holding shared data and clients.
pub struct AppState {
    /// Persisted user settings.
    pub config: AppConfig,
    /// Title provider built from the active provider config.
    pub title_generator: Option<Arc<dyn TitleGenerator>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut state = Self {
            config,
            title_generator: None,
        };
        state.refresh_generator();
        state
    }

    /// Rebuilds the title generator after the provider settings changed.
    pub fn refresh_generator(&mut self) {
        self.title_generator = self.config.get_active_provider().map(create_generator);
        match &self.title_generator {
            Some(generator) => tracing::info!("Title provider: {}", generator.name()),
            None => tracing::warn!(
                "Active provider '{}' is not configured; titles will use the default name",
                self.config.active_provider
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_builds_active_generator() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(state.title_generator.unwrap().name(), "Gemini");
    }

    #[test]
    fn test_unknown_active_provider_leaves_no_generator() {
        let mut config = AppConfig::default();
        config.active_provider = "Nobody".to_string();
        let state = AppState::new(config);
        assert!(state.title_generator.is_none());
    }

    #[test]
    fn test_refresh_follows_provider_switch() {
        let mut state = AppState::new(AppConfig::default());
        state.config.active_provider = "Ollama".to_string();
        state.refresh_generator();
        assert_eq!(state.title_generator.as_ref().unwrap().name(), "Ollama");
    }
}
