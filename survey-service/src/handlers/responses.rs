//! Response submission and listing endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::surveys::find_survey;
use crate::{
    error::{Error, Result},
    models::{Answers, Submission, SurveyId, SurveyResponse, UpsertOutcome},
    scoring,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseResult {
    pub success: bool,
    pub message: String,
    /// Score with exactly two decimals, e.g. `"3.20"`
    pub total_score: String,
}

/// `POST /submit-response`
///
/// Scores the answers against the survey's sections and upserts the record
/// for (surveyId, username). Responds only after the record is stored.
pub async fn submit_response(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Submission>, JsonRejection>,
) -> Result<Json<SubmitResponseResult>> {
    let Json(submission) = payload?;
    submission.validate().map_err(Error::ValidationError)?;

    let survey = find_survey(&state, &submission.survey_id).await?;
    submission
        .validate_against(&survey)
        .map_err(Error::ValidationError)?;

    let breakdown = scoring::breakdown(survey.sections(), &submission.responses);
    let total = breakdown.total();
    if !total.is_finite() {
        return Err(Error::ValidationError(
            "responses produce a score outside the representable range".to_string(),
        ));
    }
    let score = scoring::round_score(total);

    tracing::debug!(
        survey_id = %survey.id,
        username = %submission.username,
        section_means = ?breakdown.sections.iter().map(|s| s.mean).collect::<Vec<_>>(),
        "Score computed"
    );

    let upserted = state.responses().upsert(submission, Some(score)).await?;

    tracing::info!(
        survey_id = %upserted.record.survey_id,
        username = %upserted.record.username,
        score,
        outcome = %upserted.outcome,
        "Response stored"
    );

    let message = match upserted.outcome {
        UpsertOutcome::Created => "Response submitted successfully",
        UpsertOutcome::Updated => "Response updated successfully",
    };

    Ok(Json(SubmitResponseResult {
        success: true,
        message: message.to_string(),
        total_score: scoring::format_score(score),
    }))
}

/// `GET /survey-responses/{id}`
///
/// Username to answers for one survey. An id nobody answered, known or
/// not, yields an empty object.
pub async fn survey_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BTreeMap<String, Answers>>> {
    let survey_id = SurveyId::from(id);
    let by_user = state.responses().list_by_survey(&survey_id).await?;
    tracing::debug!(survey_id = %survey_id, count = by_user.len(), "Survey responses listed");
    Ok(Json(by_user))
}

/// `GET /responses`
pub async fn list_responses(State(state): State<AppState>) -> Result<Json<Vec<SurveyResponse>>> {
    let responses = state.responses().list_all().await?;
    tracing::debug!(count = responses.len(), "Responses listed");
    Ok(Json(responses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, router};
    use axum::{body::Body, http::Request, Router};
    use http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Router plus the id of a 0.6/0.4 survey with two items per section
    async fn with_survey(state: AppState) -> (Router, String) {
        let app = router(state);
        let (_, created) = send(
            &app,
            post_json(
                "/create-survey",
                json!({
                    "surveyTitle": "Store audit",
                    "questions": [
                        { "weight": 0.6, "items": ["a", "b"] },
                        { "weight": 0.4, "items": ["c", "d"] }
                    ]
                }),
            ),
        )
        .await;
        let id = created["surveyId"].as_str().unwrap().to_string();
        (app, id)
    }

    fn submission(id: &str, username: &str, responses: Value) -> Request<Body> {
        post_json(
            "/submit-response",
            json!({ "surveyId": id, "username": username, "responses": responses }),
        )
    }

    #[tokio::test]
    async fn test_submit_scores_weighted_sections() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        let (status, body) = send(&app, submission(&id, "alice", json!([[4, 4], [2, 2]]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Response submitted successfully");
        assert_eq!(body["totalScore"], "3.20");
    }

    #[tokio::test]
    async fn test_missing_answers_count_as_zero() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        let (_, body) = send(&app, submission(&id, "alice", json!([[4, null]]))).await;
        assert_eq!(body["totalScore"], "1.20");
    }

    #[tokio::test]
    async fn test_single_section_missing_answer() {
        let app = router(AppState::in_memory());
        let (_, created) = send(
            &app,
            post_json(
                "/create-survey",
                json!({ "surveyTitle": "Lobby", "questions": [{ "weight": 1, "items": ["a", "b"] }] }),
            ),
        )
        .await;
        let id = created["surveyId"].as_str().unwrap();

        let (status, body) = send(&app, submission(id, "alice", json!([[4, null]]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalScore"], "2.00");

        let (_, all) = send(&app, get("/responses")).await;
        assert_eq!(all[0]["score"], 2.0);
    }

    #[tokio::test]
    async fn test_overflowing_score_is_rejected_and_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        let app = router(AppState::from_config(config));

        let (status, created) = send(
            &app,
            post_json(
                "/create-survey",
                json!({ "surveyTitle": "Huge", "questions": [{ "weight": 1e308, "items": ["a"] }] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["surveyId"].as_str().unwrap();

        let (status, body) = send(&app, submission(id, "alice", json!([[10]]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, all) = send(&app, get("/responses")).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_resubmit_overwrites_single_record() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        send(&app, submission(&id, "alice", json!([[1, 1], [1, 1]]))).await;
        let (status, body) = send(&app, submission(&id, "alice", json!([[5, 5], [5, 5]]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Response updated successfully");
        assert_eq!(body["totalScore"], "5.00");

        let (_, all) = send(&app, get("/responses")).await;
        let all = all.as_array().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["responses"], json!([[5, 5], [5, 5]]));
        assert_eq!(all[0]["score"], 5.0);
        assert!(all[0]["submittedAt"].is_string());
        assert!(all[0]["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_two_users_get_two_records() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        send(&app, submission(&id, "alice", json!([[1, 2], [3, 4]]))).await;
        send(&app, submission(&id, "bob", json!([[4, 3], [2, 1]]))).await;

        let (_, all) = send(&app, get("/responses")).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, by_user) = send(&app, get(&format!("/survey-responses/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            by_user,
            json!({ "alice": [[1, 2], [3, 4]], "bob": [[4, 3], [2, 1]] })
        );
    }

    #[tokio::test]
    async fn test_survey_responses_only_lists_that_survey() {
        let (app, first) = with_survey(AppState::in_memory()).await;
        let (_, created) = send(
            &app,
            post_json(
                "/create-survey",
                json!({ "surveyTitle": "Other", "questions": [{ "weight": 1, "items": ["x"] }] }),
            ),
        )
        .await;
        let second = created["surveyId"].as_str().unwrap().to_string();

        send(&app, submission(&first, "alice", json!([[1, 1]]))).await;
        send(&app, submission(&second, "carol", json!([[3]]))).await;

        let (_, by_user) = send(&app, get(&format!("/survey-responses/{}", first))).await;
        let users: Vec<&String> = by_user.as_object().unwrap().keys().collect();
        assert_eq!(users, vec!["alice"]);

        let (status, unknown) = send(&app, get("/survey-responses/unknown")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unknown, json!({}));
    }

    #[tokio::test]
    async fn test_submit_to_unknown_survey_is_404() {
        let app = router(AppState::in_memory());

        let (status, body) = send(&app, submission("missing", "alice", json!([[1]]))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Survey not found");

        let (_, all) = send(&app, get("/responses")).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_username() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        let (status, body) = send(&app, submission(&id, " ", json!([[1, 1]]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_submit_rejects_oversized_grid() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        let (status, _) = send(&app, submission(&id, "alice", json!([[1, 1, 1]]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, submission(&id, "alice", json!([[1], [1], [1]]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_username() {
        let (app, id) = with_survey(AppState::in_memory()).await;

        let (status, _) = send(
            &app,
            post_json("/submit-response", json!({ "surveyId": id, "responses": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_json_backend_persists_concurrent_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();

        let (app, id) = with_survey(AppState::from_config(config)).await;

        let (a, b) = tokio::join!(
            send(&app, submission(&id, "alice", json!([[1, 1], [1, 1]]))),
            send(&app, submission(&id, "bob", json!([[2, 2], [2, 2]]))),
        );
        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);

        let stored: Vec<SurveyResponse> =
            serde_json::from_slice(&std::fs::read(dir.path().join("answers.json")).unwrap())
                .unwrap();
        let mut users: Vec<&str> = stored.iter().map(|r| r.username.as_str()).collect();
        users.sort();
        assert_eq!(users, vec!["alice", "bob"]);
    }
}
