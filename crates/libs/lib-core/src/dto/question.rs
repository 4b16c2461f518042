//! Question history DTOs.

use crate::model::store::models::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored assistant question as returned by `GET /previous-questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub likes: i64,
    pub category: String,
    pub author: String,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.to_string(),
            question: q.question,
            answer: q.answer,
            title: q.title,
            timestamp: q.timestamp,
            likes: q.likes,
            category: q.category,
            author: q.author,
        }
    }
}
