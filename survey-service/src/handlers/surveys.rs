//! Survey definition endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    models::{Answers, NewSurvey, Survey, SurveyId},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyResponse {
    pub success: bool,
    pub survey_id: SurveyId,
}

/// A survey as seen by one respondent, with whatever they already answered
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyForUser {
    #[serde(flatten)]
    pub survey: Survey,
    pub username: String,
    pub existing_responses: Option<Answers>,
}

/// `POST /create-survey`
pub async fn create_survey(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewSurvey>, JsonRejection>,
) -> Result<Json<CreateSurveyResponse>> {
    let Json(definition) = payload?;
    definition.validate().map_err(Error::ValidationError)?;

    let survey = state.surveys().create(definition).await?;

    tracing::info!(
        survey_id = %survey.id,
        title = %survey.definition.survey_title,
        sections = survey.sections().len(),
        "Survey created"
    );

    Ok(Json(CreateSurveyResponse {
        success: true,
        survey_id: survey.id,
    }))
}

/// `GET /survey/{id}`
pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Survey>> {
    let survey = find_survey(&state, &SurveyId::from(id)).await?;
    tracing::debug!(survey_id = %survey.id, "Survey fetched");
    Ok(Json(survey))
}

/// `GET /dashboard/{id}`
pub async fn dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Survey>> {
    let survey = find_survey(&state, &SurveyId::from(id)).await?;
    tracing::debug!(
        survey_id = %survey.id,
        title = %survey.definition.survey_title,
        "Dashboard survey fetched"
    );
    Ok(Json(survey))
}

/// `GET /survey/{surveyId}/{username}`
pub async fn get_survey_for_user(
    State(state): State<AppState>,
    Path((survey_id, username)): Path<(String, String)>,
) -> Result<Json<SurveyForUser>> {
    let survey = find_survey(&state, &SurveyId::from(survey_id)).await?;
    let existing = state.responses().find(&survey.id, &username).await?;

    tracing::debug!(
        survey_id = %survey.id,
        username = %username,
        answered = existing.is_some(),
        "Survey fetched for respondent"
    );

    Ok(Json(SurveyForUser {
        survey,
        username,
        existing_responses: existing.map(|r| r.responses),
    }))
}

/// `GET /surveys`
pub async fn list_surveys(State(state): State<AppState>) -> Result<Json<Vec<Survey>>> {
    let surveys = state.surveys().list().await?;
    tracing::debug!(count = surveys.len(), "Surveys listed");
    Ok(Json(surveys))
}

pub(crate) async fn find_survey(state: &AppState, id: &SurveyId) -> Result<Survey> {
    state.surveys().get(id).await?.ok_or_else(|| {
        tracing::debug!(survey_id = %id, "Survey not found");
        Error::NotFound("Survey not found".to_string())
    })
}
