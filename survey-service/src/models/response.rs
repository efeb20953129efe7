//! Submitted answers and stored response records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::survey::{Survey, SurveyId};

/// A single answer: a number, or free-form text
///
/// Missing answers are represented as `None` in [`SectionAnswers`] and
/// travel as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(serde_json::Number),
    Text(String),
}

impl Answer {
    /// Numeric value used for scoring
    ///
    /// Text that parses as a finite number counts as that number; any other
    /// text counts as zero.
    pub fn numeric_value(&self) -> f64 {
        match self {
            Answer::Number(n) => n.as_f64().unwrap_or(0.0),
            Answer::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
        }
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Answer::Number)
            .unwrap_or_else(|| Answer::Text(value.to_string()))
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Answer::Number(value.into())
    }
}

impl From<i32> for Answer {
    fn from(value: i32) -> Self {
        Answer::Number(value.into())
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

/// Answers for one section, indexed by item
pub type SectionAnswers = Vec<Option<Answer>>;

/// Answers for a whole survey, indexed by section then item
pub type Answers = Vec<SectionAnswers>;

/// Submit-response request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub survey_id: SurveyId,
    pub username: String,
    #[serde(default)]
    pub responses: Answers,
}

impl Submission {
    /// Validate fields that don't depend on the survey
    pub fn validate(&self) -> Result<(), String> {
        if self.survey_id.as_str().trim().is_empty() {
            return Err("surveyId cannot be empty".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("username cannot be empty".to_string());
        }
        Ok(())
    }

    /// Check the answer grid fits inside the survey's section/item shape
    ///
    /// Short grids are fine (missing answers score zero); extra sections or
    /// extra items are rejected.
    pub fn validate_against(&self, survey: &Survey) -> Result<(), String> {
        let sections = survey.sections();

        if self.responses.len() > sections.len() {
            return Err(format!(
                "responses has {} sections but the survey defines {}",
                self.responses.len(),
                sections.len()
            ));
        }

        for (index, (answers, section)) in self.responses.iter().zip(sections).enumerate() {
            if answers.len() > section.items.len() {
                return Err(format!(
                    "responses[{}] has {} answers but the section defines {} items",
                    index,
                    answers.len(),
                    section.items.len()
                ));
            }
        }

        Ok(())
    }
}

/// One user's stored answers to one survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub survey_id: SurveyId,
    pub username: String,
    #[serde(default)]
    pub responses: Answers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SurveyResponse {
    /// Build a first-time record stamped with `submittedAt`
    pub fn first(submission: Submission, score: Option<f64>) -> Self {
        Self {
            survey_id: submission.survey_id,
            username: submission.username,
            responses: submission.responses,
            score,
            submitted_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    /// Replace answers and score in place, stamping `updatedAt`
    pub fn overwrite(&mut self, responses: Answers, score: Option<f64>) {
        self.responses = responses;
        self.score = score;
        self.updated_at = Some(Utc::now());
    }

    /// Whether this record belongs to the given (survey, username) key
    pub fn matches(&self, survey_id: &SurveyId, username: &str) -> bool {
        &self.survey_id == survey_id && self.username == username
    }
}

/// Whether an upsert inserted or replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Result of an upsert: the stored record and what happened to it
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    pub record: SurveyResponse,
    pub outcome: UpsertOutcome,
}
