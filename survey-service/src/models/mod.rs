//! Survey and response data models
//!
//! Wire and on-disk field names are camelCase, matching the JSON documents
//! the service reads and writes.

mod response;
mod survey;

pub use response::{
    Answer, Answers, SectionAnswers, Submission, SurveyResponse, UpsertOutcome, Upserted,
};
pub use survey::{NewSurvey, Section, Survey, SurveyId};
