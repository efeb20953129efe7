//! Storage for surveys and responses
//!
//! The request layer depends only on [`SurveyStore`] and [`ResponseStore`].
//! Two backends are provided:
//!
//! - **JSON documents** ([`JsonSurveyStore`], [`JsonResponseStore`]): one
//!   pretty-printed array per store, rewritten on every mutation under a
//!   per-store lock
//! - **In-memory** ([`MemorySurveyStore`], [`MemoryResponseStore`]):
//!   lock-guarded maps, nothing persisted
//!
//! # Example
//!
//! ```rust,no_run
//! use survey_service::repository::{JsonSurveyStore, SurveyStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonSurveyStore::new("./survey.json");
//! for survey in store.list().await? {
//!     println!("{}: {}", survey.id, survey.definition.survey_title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod json_file;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use json_file::{JsonDocument, JsonResponseStore, JsonSurveyStore};
pub use memory::{MemoryResponseStore, MemorySurveyStore};
pub use traits::{RepositoryResult, ResponseStore, SurveyStore};
