use pathwise_core::model::{Learner, LearnerId, LearningPath, QuizResult};

use super::SqliteRepository;
use super::learner_repo::insert_learner_row;
use super::mapping::conn;
use super::path_repo::upsert_path_row;
use super::quiz_result_repo::insert_result_row;
use crate::repository::{ProgressPersistence, QuizResultId, StorageError};

#[async_trait::async_trait]
impl ProgressPersistence for SqliteRepository {
    async fn create_learner_with_path(
        &self,
        learner: &Learner,
        path: &LearningPath,
    ) -> Result<(), StorageError> {
        if path.learner_id() != learner.id() {
            return Err(StorageError::Conflict);
        }

        let mut tx = self.pool.begin().await.map_err(conn)?;
        insert_learner_row(&mut *tx, learner).await?;
        upsert_path_row(&mut *tx, path).await?;
        tx.commit().await.map_err(conn)?;

        Ok(())
    }

    async fn record_quiz(
        &self,
        learner_id: LearnerId,
        result: &QuizResult,
        advanced_path: Option<&LearningPath>,
    ) -> Result<QuizResultId, StorageError> {
        if advanced_path.is_some_and(|p| p.learner_id() != learner_id) {
            return Err(StorageError::Conflict);
        }

        let mut tx = self.pool.begin().await.map_err(conn)?;
        let id = insert_result_row(&mut *tx, learner_id, result).await?;
        if let Some(path) = advanced_path {
            upsert_path_row(&mut *tx, path).await?;
        }
        tx.commit().await.map_err(conn)?;

        Ok(id)
    }
}
