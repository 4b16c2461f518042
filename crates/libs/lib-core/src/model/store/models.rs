use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Category stamped on every question produced by the assistant.
pub const AI_RESPONSE_CATEGORY: &str = "AI Response";

/// Author stamped on every question produced by the assistant.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous User";

/// Question entity as stored in the `questions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub likes: i64,
    pub category: String,
    pub author: String,
}

/// A resolved assistant question, ready to be appended to the store.
///
/// Built once per successfully answered command, after both the answer and
/// the title are known.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub likes: i64,
    pub category: String,
    pub author: String,
}

impl QuestionRecord {
    /// Create a record stamped with the current time and the assistant defaults.
    pub fn new(question: String, answer: String, title: String) -> Self {
        Self {
            question,
            answer,
            title,
            timestamp: lib_utils::now_utc(),
            likes: 0,
            category: AI_RESPONSE_CATEGORY.to_string(),
            author: ANONYMOUS_AUTHOR.to_string(),
        }
    }
}

/// Alert entity as stored in the `alerts` table.
///
/// `preventive_measures` holds a JSON array of strings.
#[derive(Debug, Clone, FromRow)]
pub struct Alert {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: i64,
    pub severity: String,
    pub timestamp: String,
    pub description: String,
    pub preventive_measures: String,
}

/// Data structure for creating a new alert.
#[derive(Debug, Clone)]
pub struct AlertForCreate {
    pub title: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: i64,
    pub severity: String,
    pub timestamp: String,
    pub description: String,
    pub preventive_measures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_record_defaults() {
        let record = QuestionRecord::new("q".into(), "a".into(), "t".into());
        assert_eq!(record.likes, 0);
        assert_eq!(record.category, "AI Response");
        assert_eq!(record.author, "Anonymous User");
    }
}
