//! Question persistence seen from the dispatcher: append only.

use async_trait::async_trait;
use lib_core::model::store::{models::QuestionRecord, QuestionRepository};
use lib_core::DbPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to append question: {0}")]
    Write(#[from] sqlx::Error),
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn append(&self, record: QuestionRecord) -> Result<(), StoreError>;
}

/// SQLite-backed store over [`QuestionRepository`].
pub struct SqliteQuestionStore {
    pool: DbPool,
}

impl SqliteQuestionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    async fn append(&self, record: QuestionRecord) -> Result<(), StoreError> {
        let stored = QuestionRepository::create(&self.pool, &record).await?;
        tracing::debug!(question_id = stored.id, "question appended");
        Ok(())
    }
}
