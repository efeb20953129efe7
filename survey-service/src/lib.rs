//! # survey-service
//!
//! HTTP backend for weighted audit surveys: create a survey, collect one
//! scored response per user, and list what was submitted.
//!
//! ## Features
//!
//! - **Surveys**: sections of question items, each section carrying a weight
//! - **Responses**: one record per (survey, username), overwritten on resubmit
//! - **Scoring**: sum of section means times section weights, two decimals
//! - **Storage**: JSON documents on disk or in-memory, behind store traits
//! - **Middleware stack**: request IDs, tracing, CORS, compression, body limits, timeouts
//! - **Health checks**: Liveness and readiness probes
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use survey_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::from_config(config.clone());
//!
//!     Server::new(config)
//!         .serve(router(state))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use axum::{
    routing::{get, post},
    Router,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod scoring;
pub mod server;
pub mod state;

/// Build the application router
///
/// Middleware is applied separately by [`server::Server`], so tests can
/// drive the bare routes.
pub fn router(state: state::AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route("/create-survey", post(handlers::create_survey))
        .route("/survey/{id}", get(handlers::get_survey))
        .route("/survey/{id}/{username}", get(handlers::get_survey_for_user))
        .route("/surveys", get(handlers::list_surveys))
        .route("/dashboard/{id}", get(handlers::dashboard))
        .route("/submit-response", post(handlers::submit_response))
        .route("/survey-responses/{id}", get(handlers::survey_responses))
        .route("/responses", get(handlers::list_responses))
        .with_state(state)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, LogFormat, StorageBackend};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Answer, Answers, NewSurvey, Section, Submission, Survey, SurveyId, SurveyResponse,
    };
    pub use crate::observability::init_tracing;
    pub use crate::repository::{ResponseStore, SurveyStore};
    pub use crate::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
