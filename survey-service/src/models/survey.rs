//! Survey definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque survey identifier
///
/// Generated as a UUID v4 string on creation. Lookups accept any string so
/// that documents written by older deployments keep resolving.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(String);

impl SurveyId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SurveyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SurveyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A weighted group of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Optional heading shown above the items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Multiplier applied to this section's mean answer
    pub weight: f64,

    /// Question prompts, in display order
    #[serde(default)]
    pub items: Vec<String>,
}

/// Create-survey request body and the user-supplied part of a stored survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    pub survey_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_date: Option<String>,

    #[serde(default)]
    pub evaluators: Vec<String>,

    pub questions: Vec<Section>,
}

impl NewSurvey {
    /// Validate the survey definition
    pub fn validate(&self) -> Result<(), String> {
        if self.survey_title.trim().is_empty() {
            return Err("surveyTitle cannot be empty".to_string());
        }

        if self.evaluators.iter().any(|e| e.trim().is_empty()) {
            return Err("evaluators cannot contain empty names".to_string());
        }

        for (index, section) in self.questions.iter().enumerate() {
            if !section.weight.is_finite() || section.weight < 0.0 {
                return Err(format!(
                    "questions[{}].weight must be a non-negative number",
                    index
                ));
            }
        }

        Ok(())
    }
}

/// A stored survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,

    #[serde(flatten)]
    pub definition: NewSurvey,

    /// Absent on surveys written before timestamps were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Survey {
    /// Stamp a definition with a fresh id and creation time
    pub fn create(definition: NewSurvey) -> Self {
        Self {
            id: SurveyId::generate(),
            definition,
            created_at: Some(Utc::now()),
        }
    }

    /// Sections in display order
    pub fn sections(&self) -> &[Section] {
        &self.definition.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn audit_survey() -> NewSurvey {
        NewSurvey {
            survey_title: "Kitchen audit".to_string(),
            audit_name: Some("Q3".to_string()),
            audit_date: Some("2024-09-01".to_string()),
            evaluators: vec!["Aysel".to_string(), "Murad".to_string()],
            questions: vec![Section {
                title: Some("Hygiene".to_string()),
                weight: 0.6,
                items: vec!["Surfaces clean".to_string(), "Staff gloved".to_string()],
            }],
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SurveyId::generate(), SurveyId::generate());
    }

    #[test]
    fn test_survey_serializes_flat_camel_case() {
        let survey = Survey::create(audit_survey());
        let value = serde_json::to_value(&survey).unwrap();

        assert_eq!(value["id"], json!(survey.id.as_str()));
        assert_eq!(value["surveyTitle"], json!("Kitchen audit"));
        assert_eq!(value["auditName"], json!("Q3"));
        assert_eq!(value["questions"][0]["weight"], json!(0.6));
        assert!(value.get("definition").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_legacy_document_without_optional_fields() {
        let survey: Survey = serde_json::from_value(json!({
            "id": "legacy-1",
            "surveyTitle": "Old",
            "questions": [{ "weight": 1, "items": ["a"] }]
        }))
        .unwrap();

        assert_eq!(survey.id.as_str(), "legacy-1");
        assert!(survey.created_at.is_none());
        assert!(survey.definition.evaluators.is_empty());
        assert_eq!(survey.sections()[0].weight, 1.0);
    }

    #[test]
    fn test_validate_accepts_well_formed_definition() {
        assert!(audit_survey().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut survey = audit_survey();
        survey.survey_title = "   ".to_string();
        assert!(survey.validate().unwrap_err().contains("surveyTitle"));
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut survey = audit_survey();
        survey.questions[0].weight = -0.5;
        assert!(survey.validate().unwrap_err().contains("questions[0].weight"));
    }

    #[test]
    fn test_validate_rejects_blank_evaluator() {
        let mut survey = audit_survey();
        survey.evaluators.push(String::new());
        assert!(survey.validate().is_err());
    }

    #[test]
    fn test_section_without_items_is_allowed() {
        let mut survey = audit_survey();
        survey.questions.push(Section {
            title: None,
            weight: 0.4,
            items: vec![],
        });
        assert!(survey.validate().is_ok());
    }
}
