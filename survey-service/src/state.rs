//! Application state management

use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    repository::{
        JsonResponseStore, JsonSurveyStore, MemoryResponseStore, MemorySurveyStore, ResponseStore,
        SurveyStore,
    },
};

/// Application state shared across handlers
///
/// Handlers only see the store traits; which backend sits behind them is
/// decided once, in [`AppState::from_config`].
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    surveys: Arc<dyn SurveyStore>,
    responses: Arc<dyn ResponseStore>,
}

impl AppState {
    /// Create state from explicit store implementations
    pub fn new(
        config: Config,
        surveys: Arc<dyn SurveyStore>,
        responses: Arc<dyn ResponseStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            surveys,
            responses,
        }
    }

    /// Create state with the backend selected by `storage.backend`
    pub fn from_config(config: Config) -> Self {
        let (surveys, responses): (Arc<dyn SurveyStore>, Arc<dyn ResponseStore>) =
            match config.storage.backend {
                StorageBackend::Json => {
                    let surveys_path = config.storage.surveys_path();
                    let responses_path = config.storage.responses_path();
                    tracing::info!(
                        surveys = %surveys_path.display(),
                        responses = %responses_path.display(),
                        "Using JSON file storage"
                    );
                    (
                        Arc::new(JsonSurveyStore::new(surveys_path)),
                        Arc::new(JsonResponseStore::new(responses_path)),
                    )
                }
                StorageBackend::Memory => {
                    tracing::warn!("Using in-memory storage; data is lost on restart");
                    (
                        Arc::new(MemorySurveyStore::new()),
                        Arc::new(MemoryResponseStore::new()),
                    )
                }
            };

        Self::new(config, surveys, responses)
    }

    /// Default config with empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Config::default(),
            Arc::new(MemorySurveyStore::new()),
            Arc::new(MemoryResponseStore::new()),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surveys(&self) -> &dyn SurveyStore {
        self.surveys.as_ref()
    }

    pub fn responses(&self) -> &dyn ResponseStore {
        self.responses.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSurvey, Section};

    #[tokio::test]
    async fn test_json_backend_writes_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();

        let state = AppState::from_config(config);
        state
            .surveys()
            .create(NewSurvey {
                survey_title: "Kitchen".to_string(),
                audit_name: None,
                audit_date: None,
                evaluators: vec![],
                questions: vec![Section {
                    title: None,
                    weight: 1.0,
                    items: vec!["clean?".to_string()],
                }],
            })
            .await
            .unwrap();

        assert!(dir.path().join("survey.json").exists());
        assert!(!dir.path().join("answers.json").exists());
    }

    #[tokio::test]
    async fn test_memory_backend_starts_empty() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let state = AppState::from_config(config);
        assert!(state.surveys().list().await.unwrap().is_empty());
        assert!(state.responses().list_all().await.unwrap().is_empty());
    }
}
