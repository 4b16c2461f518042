//! # Question History Handlers
//!
//! - `GET /previous-questions` - Newest assistant answers, newest first
//!
//! ```bash
//! curl http://localhost:5000/previous-questions
//! ```

use crate::services::QuestionService;
use axum::{extract::State, Json};
use lib_core::dto::QuestionResponse;
use lib_core::{AppError, Config, DbPool};
use tracing::{info, instrument};

/// List stored assistant questions.
///
/// **Route**: `GET /previous-questions`
///
/// Success (200): JSON array of questions, each with `_id`, `question`,
/// `answer`, `title`, `timestamp`, `likes`, `category` and `author`.
///
/// Error (500): database failure
#[instrument(skip_all)]
pub async fn previous_questions(
    State(db): State<DbPool>,
    State(config): State<Config>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let service = QuestionService::new(db, config.question_history_limit);
    let questions = service.recent().await?;

    info!("[QUESTIONS] Returning {} questions", questions.len());
    Ok(Json(questions))
}
