//! JSON document stores
//!
//! Each store owns one pretty-printed JSON array on disk. Every operation
//! re-reads the document, so edits made to the file between requests are
//! picked up. Mutations hold the store's mutex across read, modify and
//! write; two submissions racing on the same file can no longer overwrite
//! each other's records.
//!
//! Writes go to a sibling temp file, which is synced to disk and then
//! renamed over the document. Rename is atomic, so readers never observe a
//! partial write and don't need the lock. A failed write removes the temp
//! file and leaves the previous document in place.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{RepositoryResult, ResponseStore, SurveyStore};
use crate::models::{
    Answers, NewSurvey, Submission, Survey, SurveyId, SurveyResponse, UpsertOutcome, Upserted,
};

/// A JSON array of records persisted as a single file
#[derive(Debug)]
pub struct JsonDocument<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    /// Read every record; a missing or blank file is an empty collection
    pub async fn read(&self, operation: RepositoryOperation) -> RepositoryResult<Vec<T>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RepositoryError::storage(
                    operation,
                    format!("Failed to read {}: {}", self.path.display(), e),
                ))
            }
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&contents).map_err(|e| {
            RepositoryError::serialization(
                operation,
                format!("Failed to decode {}: {}", self.path.display(), e),
            )
        })
    }

    /// Read, apply `mutate`, and write back, all under the document lock
    ///
    /// Nothing is written if reading fails, and the caller only gets the
    /// closure's result once the write has completed.
    pub async fn update<R, F>(&self, operation: RepositoryOperation, mutate: F) -> RepositoryResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> R + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read(operation).await?;
        let result = mutate(&mut records);
        self.write(operation, &records).await?;

        Ok(result)
    }

    async fn write(&self, operation: RepositoryOperation, records: &[T]) -> RepositoryResult<()> {
        let body = serde_json::to_vec_pretty(records).map_err(|e| {
            RepositoryError::serialization(
                operation,
                format!("Failed to encode {}: {}", self.path.display(), e),
            )
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RepositoryError::storage(
                    operation,
                    format!("Failed to create directory {}: {}", parent.display(), e),
                )
            })?;
        }

        let tmp_path = self.temp_path();
        let replaced = match write_synced(&tmp_path, &body).await {
            Ok(()) => tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
                format!("Failed to replace {}: {}", self.path.display(), e)
            }),
            Err(e) => Err(format!("Failed to write {}: {}", tmp_path.display(), e)),
        };

        if let Err(message) = replaced {
            if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp_path.display(), "Failed to remove temp file: {}", e);
                }
            }
            return Err(RepositoryError::storage(operation, message));
        }

        tracing::debug!(path = %self.path.display(), bytes = body.len(), "Document written");

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `body` to `path` and flush it to the device
async fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}

/// Survey store backed by a JSON document
#[derive(Debug)]
pub struct JsonSurveyStore {
    document: JsonDocument<Survey>,
}

impl JsonSurveyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: JsonDocument::new(path),
        }
    }
}

#[async_trait]
impl SurveyStore for JsonSurveyStore {
    async fn create(&self, definition: NewSurvey) -> RepositoryResult<Survey> {
        let survey = Survey::create(definition);
        let stored = survey.clone();

        self.document
            .update(RepositoryOperation::Create, move |surveys| surveys.push(stored))
            .await
            .map_err(|e| e.with_entity("Survey", survey.id.as_str()))?;

        Ok(survey)
    }

    async fn get(&self, id: &SurveyId) -> RepositoryResult<Option<Survey>> {
        let surveys = self.document.read(RepositoryOperation::FindById).await?;
        Ok(surveys.into_iter().find(|s| &s.id == id))
    }

    async fn list(&self) -> RepositoryResult<Vec<Survey>> {
        self.document.read(RepositoryOperation::FindAll).await
    }
}

/// Response store backed by a JSON document
///
/// The on-disk layout is a flat array, so upserts scan for the matching
/// (survey id, username) pair.
#[derive(Debug)]
pub struct JsonResponseStore {
    document: JsonDocument<SurveyResponse>,
}

impl JsonResponseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: JsonDocument::new(path),
        }
    }
}

#[async_trait]
impl ResponseStore for JsonResponseStore {
    async fn upsert(
        &self,
        submission: Submission,
        score: Option<f64>,
    ) -> RepositoryResult<Upserted> {
        let entity_id = format!("{}/{}", submission.survey_id, submission.username);

        self.document
            .update(RepositoryOperation::Upsert, move |records| {
                let existing = records
                    .iter()
                    .position(|r| r.matches(&submission.survey_id, &submission.username));

                match existing {
                    Some(index) => {
                        let record = &mut records[index];
                        record.overwrite(submission.responses, score);
                        Upserted {
                            record: record.clone(),
                            outcome: UpsertOutcome::Updated,
                        }
                    }
                    None => {
                        let record = SurveyResponse::first(submission, score);
                        records.push(record.clone());
                        Upserted {
                            record,
                            outcome: UpsertOutcome::Created,
                        }
                    }
                }
            })
            .await
            .map_err(|e| e.with_entity("Response", entity_id))
    }

    async fn find(
        &self,
        survey_id: &SurveyId,
        username: &str,
    ) -> RepositoryResult<Option<SurveyResponse>> {
        let records = self.document.read(RepositoryOperation::FindById).await?;
        Ok(records.into_iter().find(|r| r.matches(survey_id, username)))
    }

    async fn list_all(&self) -> RepositoryResult<Vec<SurveyResponse>> {
        self.document.read(RepositoryOperation::FindAll).await
    }

    async fn list_by_survey(
        &self,
        survey_id: &SurveyId,
    ) -> RepositoryResult<BTreeMap<String, Answers>> {
        let records = self.document.read(RepositoryOperation::FindAll).await?;
        Ok(records
            .into_iter()
            .filter(|r| &r.survey_id == survey_id)
            .map(|r| (r.username, r.responses))
            .collect())
    }
}
