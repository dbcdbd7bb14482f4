//! Read-side access to the aggregates the views are built from.

use std::sync::Arc;

use async_trait::async_trait;
use pathwise_core::model::{Learner, LearnerId, LearningPath, QuizResult, Resource, ResourceId};
use storage::repository::{
    LearnerRepository, PathRepository, QuizResultRepository, ResourceRepository, Storage,
};

use crate::error::GatewayError;

/// Fetches point-in-time snapshots of learner aggregates.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the learner does not exist.
    async fn fetch_learner(&self, id: LearnerId) -> Result<Learner, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if no path is assigned to the learner.
    async fn fetch_learning_path(
        &self,
        learner_id: LearnerId,
    ) -> Result<LearningPath, GatewayError>;

    /// Results ordered by `recorded_at`; empty when the learner has none.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Storage` on backend failures.
    async fn fetch_quiz_results(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<QuizResult>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the catalog has no such entry.
    async fn fetch_resource_catalog_entry(
        &self,
        resource_id: &ResourceId,
    ) -> Result<Resource, GatewayError>;

    /// Every learner. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Storage` on backend failures.
    async fn fetch_all_learners(&self) -> Result<Vec<Learner>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError::Storage` on backend failures.
    async fn fetch_all_paths(&self) -> Result<Vec<LearningPath>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError::Storage` on backend failures.
    async fn count_quiz_results(&self) -> Result<u64, GatewayError>;
}

/// `Gateway` over the storage repositories.
#[derive(Clone)]
pub struct StorageGateway {
    learners: Arc<dyn LearnerRepository>,
    paths: Arc<dyn PathRepository>,
    quiz_results: Arc<dyn QuizResultRepository>,
    resources: Arc<dyn ResourceRepository>,
}

impl StorageGateway {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        Self {
            learners: Arc::clone(&storage.learners),
            paths: Arc::clone(&storage.paths),
            quiz_results: Arc::clone(&storage.quiz_results),
            resources: Arc::clone(&storage.resources),
        }
    }
}

#[async_trait]
impl Gateway for StorageGateway {
    async fn fetch_learner(&self, id: LearnerId) -> Result<Learner, GatewayError> {
        self.learners
            .get_learner(id)
            .await?
            .ok_or(GatewayError::NotFound("learner"))
    }

    async fn fetch_learning_path(
        &self,
        learner_id: LearnerId,
    ) -> Result<LearningPath, GatewayError> {
        self.paths
            .get_path_for_learner(learner_id)
            .await?
            .ok_or(GatewayError::NotFound("learning path"))
    }

    async fn fetch_quiz_results(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<QuizResult>, GatewayError> {
        Ok(self.quiz_results.list_results(learner_id).await?)
    }

    async fn fetch_resource_catalog_entry(
        &self,
        resource_id: &ResourceId,
    ) -> Result<Resource, GatewayError> {
        self.resources
            .get_resource(resource_id)
            .await?
            .ok_or(GatewayError::NotFound("resource"))
    }

    async fn fetch_all_learners(&self) -> Result<Vec<Learner>, GatewayError> {
        Ok(self.learners.list_learners().await?)
    }

    async fn fetch_all_paths(&self) -> Result<Vec<LearningPath>, GatewayError> {
        Ok(self.paths.list_paths().await?)
    }

    async fn count_quiz_results(&self) -> Result<u64, GatewayError> {
        Ok(self.quiz_results.count_results().await?)
    }
}
