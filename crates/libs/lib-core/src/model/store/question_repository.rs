//! # Question Repository
//!
//! Append and read access to resolved assistant questions.

use super::models::{Question, QuestionRecord};
use super::DbPool;
use sqlx::query_as;

/// Question repository for database operations.
pub struct QuestionRepository;

impl QuestionRepository {
    /// Append a resolved question and return the stored row.
    pub async fn create(pool: &DbPool, record: &QuestionRecord) -> Result<Question, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO questions (question, answer, title, timestamp, likes, category, author)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&record.question)
        .bind(&record.answer)
        .bind(&record.title)
        .bind(record.timestamp)
        .bind(record.likes)
        .bind(&record.category)
        .bind(&record.author)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, Question>("SELECT * FROM questions WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List the most recent questions, newest first.
    pub async fn list_recent(pool: &DbPool, limit: i64) -> Result<Vec<Question>, sqlx::Error> {
        query_as::<_, Question>(
            "SELECT * FROM questions ORDER BY timestamp DESC, id DESC LIMIT ?"
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::test_pool;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_create_then_list() {
        let pool = test_pool().await;

        let record = QuestionRecord::new(
            "what is glaucoma".to_string(),
            "An eye condition.".to_string(),
            "Understanding Glaucoma".to_string(),
        );
        let stored = QuestionRepository::create(&pool, &record).await.unwrap();
        assert_eq!(stored.question, "what is glaucoma");
        assert_eq!(stored.likes, 0);
        assert_eq!(stored.category, "AI Response");

        let listed = QuestionRepository::list_recent(&pool, 50).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_list_recent_orders_and_limits() {
        let pool = test_pool().await;
        let base = Utc::now();

        for i in 0..5 {
            let mut record = QuestionRecord::new(format!("q{}", i), "a".into(), "t".into());
            record.timestamp = base + Duration::seconds(i);
            QuestionRepository::create(&pool, &record).await.unwrap();
        }

        let listed = QuestionRepository::list_recent(&pool, 3).await.unwrap();
        let questions: Vec<_> = listed.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(questions, vec!["q4", "q3", "q2"]);
    }
}
