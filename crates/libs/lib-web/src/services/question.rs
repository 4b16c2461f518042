//! Read side of the assistant question history.

use lib_core::dto::QuestionResponse;
use lib_core::model::store::QuestionRepository;
use lib_core::{AppError, DbPool};
use tracing::debug;

pub struct QuestionService {
    db: DbPool,
    limit: i64,
}

impl QuestionService {
    pub fn new(db: DbPool, limit: i64) -> Self {
        Self { db, limit }
    }

    /// Newest questions first, capped at the configured history limit.
    pub async fn recent(&self) -> Result<Vec<QuestionResponse>, AppError> {
        let questions = QuestionRepository::list_recent(&self.db, self.limit).await?;
        debug!(count = questions.len(), limit = self.limit, "loaded question history");
        Ok(questions.into_iter().map(QuestionResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::model::store::memory_pool;
    use lib_core::model::store::models::QuestionRecord;

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let pool = memory_pool().await.unwrap();
        for i in 0..3 {
            let record = QuestionRecord::new(format!("q{}", i), "a".into(), "t".into());
            QuestionRepository::create(&pool, &record).await.unwrap();
        }

        let recent = QuestionService::new(pool, 2).recent().await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].question, "q2");
    }
}
