//! HTTP handlers
//!
//! Handlers decode and validate the request body, call the stores through
//! [`AppState`](crate::state::AppState), and map failures onto
//! [`Error`](crate::error::Error) so every error body has the same shape.

pub mod responses;
pub mod surveys;

pub use responses::{list_responses, survey_responses, submit_response, SubmitResponseResult};
pub use surveys::{
    create_survey, dashboard, get_survey, get_survey_for_user, list_surveys,
    CreateSurveyResponse, SurveyForUser,
};
