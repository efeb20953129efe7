//! Store trait definitions
//!
//! Handlers only see these traits; the backend is chosen at startup and
//! injected into [`AppState`](crate::state::AppState) as a trait object.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::RepositoryError;
use crate::models::{Answers, NewSurvey, Submission, Survey, SurveyId, SurveyResponse, Upserted};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Persistence for survey definitions
///
/// Surveys are immutable once created; there is no update or delete.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Assign a fresh id, persist, and return the stored survey
    async fn create(&self, definition: NewSurvey) -> RepositoryResult<Survey>;

    /// Look up a survey by id
    async fn get(&self, id: &SurveyId) -> RepositoryResult<Option<Survey>>;

    /// All stored surveys; empty when none exist
    async fn list(&self) -> RepositoryResult<Vec<Survey>>;
}

/// Persistence for response records
///
/// Holds at most one record per (survey id, username).
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Insert a new record, or replace the answers and score of the
    /// existing record for the same (survey id, username)
    async fn upsert(&self, submission: Submission, score: Option<f64>)
        -> RepositoryResult<Upserted>;

    /// The record for one (survey id, username), if any
    async fn find(&self, survey_id: &SurveyId, username: &str)
        -> RepositoryResult<Option<SurveyResponse>>;

    /// Every stored record across all surveys
    async fn list_all(&self) -> RepositoryResult<Vec<SurveyResponse>>;

    /// Answers submitted to one survey, keyed by username
    async fn list_by_survey(&self, survey_id: &SurveyId)
        -> RepositoryResult<BTreeMap<String, Answers>>;
}
