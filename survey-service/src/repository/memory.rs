//! In-memory stores
//!
//! Used for tests and for `storage.backend = "memory"`. Responses are
//! indexed by their composite (survey id, username) key, so the
//! one-record-per-key invariant holds by construction.

use std::collections::{btree_map::Entry, BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::{RepositoryResult, ResponseStore, SurveyStore};
use crate::models::{
    Answers, NewSurvey, Submission, Survey, SurveyId, SurveyResponse, UpsertOutcome, Upserted,
};

#[derive(Debug, Default)]
pub struct MemorySurveyStore {
    surveys: RwLock<HashMap<SurveyId, Survey>>,
}

impl MemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SurveyStore for MemorySurveyStore {
    async fn create(&self, definition: NewSurvey) -> RepositoryResult<Survey> {
        let survey = Survey::create(definition);
        self.surveys
            .write()
            .await
            .insert(survey.id.clone(), survey.clone());
        Ok(survey)
    }

    async fn get(&self, id: &SurveyId) -> RepositoryResult<Option<Survey>> {
        Ok(self.surveys.read().await.get(id).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Survey>> {
        let mut surveys: Vec<Survey> = self.surveys.read().await.values().cloned().collect();
        // HashMap order is arbitrary; creation order keeps listings stable
        surveys.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(surveys)
    }
}

type ResponseKey = (SurveyId, String);

#[derive(Debug, Default)]
pub struct MemoryResponseStore {
    responses: RwLock<BTreeMap<ResponseKey, SurveyResponse>>,
}

impl MemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseStore for MemoryResponseStore {
    async fn upsert(
        &self,
        submission: Submission,
        score: Option<f64>,
    ) -> RepositoryResult<Upserted> {
        let key = (submission.survey_id.clone(), submission.username.clone());
        let mut responses = self.responses.write().await;

        let upserted = match responses.entry(key) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.overwrite(submission.responses, score);
                Upserted {
                    record: existing.clone(),
                    outcome: UpsertOutcome::Updated,
                }
            }
            Entry::Vacant(entry) => {
                let record = entry.insert(SurveyResponse::first(submission, score)).clone();
                Upserted {
                    record,
                    outcome: UpsertOutcome::Created,
                }
            }
        };

        Ok(upserted)
    }

    async fn find(
        &self,
        survey_id: &SurveyId,
        username: &str,
    ) -> RepositoryResult<Option<SurveyResponse>> {
        let key = (survey_id.clone(), username.to_string());
        Ok(self.responses.read().await.get(&key).cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<SurveyResponse>> {
        Ok(self.responses.read().await.values().cloned().collect())
    }

    async fn list_by_survey(
        &self,
        survey_id: &SurveyId,
    ) -> RepositoryResult<BTreeMap<String, Answers>> {
        Ok(self
            .responses
            .read()
            .await
            .values()
            .filter(|r| &r.survey_id == survey_id)
            .map(|r| (r.username.clone(), r.responses.clone()))
            .collect())
    }
}
