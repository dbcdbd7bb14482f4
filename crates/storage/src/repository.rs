use async_trait::async_trait;
use pathwise_core::model::{Learner, LearnerId, LearningPath, QuizResult, Resource, ResourceId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage identifier for a recorded quiz result.
///
/// NOTE: This is `i64` to match `SQLite` row IDs.
pub type QuizResultId = i64;

/// Repository contract for learner profiles.
#[async_trait]
pub trait LearnerRepository: Send + Sync {
    /// Persist a new learner.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is taken, or other storage errors.
    async fn insert_learner(&self, learner: &Learner) -> Result<(), StorageError>;

    /// Fetch a learner by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_learner(&self, id: LearnerId) -> Result<Option<Learner>, StorageError>;

    /// All learners, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_learners(&self) -> Result<Vec<Learner>, StorageError>;
}

/// Repository contract for learning paths. A learner has at most one path.
#[async_trait]
pub trait PathRepository: Send + Sync {
    /// Persist a path, replacing any existing path of the same learner.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the path cannot be stored.
    async fn upsert_path(&self, path: &LearningPath) -> Result<(), StorageError>;

    /// Fetch the path assigned to a learner.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_path_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Option<LearningPath>, StorageError>;

    /// Every stored path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_paths(&self) -> Result<Vec<LearningPath>, StorageError>;
}

/// Append-only store of quiz results.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Record a result for a learner.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(
        &self,
        learner_id: LearnerId,
        result: &QuizResult,
    ) -> Result<QuizResultId, StorageError>;

    /// A learner's results ordered by `recorded_at`, then insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_results(&self, learner_id: LearnerId) -> Result<Vec<QuizResult>, StorageError>;

    /// Number of results across all learners.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn count_results(&self) -> Result<u64, StorageError>;
}

/// Writes that touch more than one table and must land together.
#[async_trait]
pub trait ProgressPersistence: Send + Sync {
    /// Persist a new learner and their first path in one step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the path belongs to another learner
    /// or either id is taken. Nothing is stored on error.
    async fn create_learner_with_path(
        &self,
        learner: &Learner,
        path: &LearningPath,
    ) -> Result<(), StorageError>;

    /// Append a result and, when given, save the advanced path in one step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the path belongs to another learner.
    /// Nothing is stored on error.
    async fn record_quiz(
        &self,
        learner_id: LearnerId,
        result: &QuizResult,
        advanced_path: Option<&LearningPath>,
    ) -> Result<QuizResultId, StorageError>;
}

/// Repository contract for the resource catalog.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Persist or update a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the resource cannot be stored.
    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError>;

    /// Fetch a catalog entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_resource(&self, id: &ResourceId) -> Result<Option<Resource>, StorageError>;

    /// Whole catalog ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    learners: Arc<Mutex<HashMap<LearnerId, Learner>>>,
    paths: Arc<Mutex<HashMap<LearnerId, LearningPath>>>,
    results: Arc<Mutex<Vec<(QuizResultId, LearnerId, QuizResult)>>>,
    resources: Arc<Mutex<HashMap<ResourceId, Resource>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl LearnerRepository for InMemoryRepository {
    async fn insert_learner(&self, learner: &Learner) -> Result<(), StorageError> {
        let mut guard = self.learners.lock().map_err(poisoned)?;
        if guard.contains_key(&learner.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(learner.id(), learner.clone());
        Ok(())
    }

    async fn get_learner(&self, id: LearnerId) -> Result<Option<Learner>, StorageError> {
        let guard = self.learners.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_learners(&self) -> Result<Vec<Learner>, StorageError> {
        let guard = self.learners.lock().map_err(poisoned)?;
        let mut learners: Vec<Learner> = guard.values().cloned().collect();
        learners.sort_by_key(|l| (l.created_at(), l.id()));
        Ok(learners)
    }
}

#[async_trait]
impl PathRepository for InMemoryRepository {
    async fn upsert_path(&self, path: &LearningPath) -> Result<(), StorageError> {
        let mut guard = self.paths.lock().map_err(poisoned)?;
        guard.insert(path.learner_id(), path.clone());
        Ok(())
    }

    async fn get_path_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Option<LearningPath>, StorageError> {
        let guard = self.paths.lock().map_err(poisoned)?;
        Ok(guard.get(&learner_id).cloned())
    }

    async fn list_paths(&self) -> Result<Vec<LearningPath>, StorageError> {
        let guard = self.paths.lock().map_err(poisoned)?;
        let mut paths: Vec<LearningPath> = guard.values().cloned().collect();
        paths.sort_by_key(|p| (p.created_at(), p.id()));
        Ok(paths)
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryRepository {
    async fn append_result(
        &self,
        learner_id: LearnerId,
        result: &QuizResult,
    ) -> Result<QuizResultId, StorageError> {
        let mut guard = self.results.lock().map_err(poisoned)?;
        let next_id = guard.last().map_or(1, |(id, _, _)| id + 1);
        guard.push((next_id, learner_id, result.clone()));
        Ok(next_id)
    }

    async fn list_results(&self, learner_id: LearnerId) -> Result<Vec<QuizResult>, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        let mut rows: Vec<&(QuizResultId, LearnerId, QuizResult)> = guard
            .iter()
            .filter(|(_, owner, _)| *owner == learner_id)
            .collect();
        rows.sort_by_key(|(id, _, result)| (result.recorded_at(), *id));
        Ok(rows.into_iter().map(|(_, _, r)| r.clone()).collect())
    }

    async fn count_results(&self) -> Result<u64, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        u64::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl ProgressPersistence for InMemoryRepository {
    async fn create_learner_with_path(
        &self,
        learner: &Learner,
        path: &LearningPath,
    ) -> Result<(), StorageError> {
        if path.learner_id() != learner.id() {
            return Err(StorageError::Conflict);
        }
        let mut learners = self.learners.lock().map_err(poisoned)?;
        let mut paths = self.paths.lock().map_err(poisoned)?;
        if learners.contains_key(&learner.id()) || paths.values().any(|p| p.id() == path.id()) {
            return Err(StorageError::Conflict);
        }
        learners.insert(learner.id(), learner.clone());
        paths.insert(path.learner_id(), path.clone());
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
        let mut paths = self.paths.lock().map_err(poisoned)?;
        let mut results = self.results.lock().map_err(poisoned)?;
        let next_id = results.last().map_or(1, |(id, _, _)| id + 1);
        results.push((next_id, learner_id, result.clone()));
        if let Some(path) = advanced_path {
            paths.insert(learner_id, path.clone());
        }
        Ok(next_id)
    }
}

#[async_trait]
impl ResourceRepository for InMemoryRepository {
    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError> {
        let mut guard = self.resources.lock().map_err(poisoned)?;
        guard.insert(resource.id.clone(), resource.clone());
        Ok(())
    }

    async fn get_resource(&self, id: &ResourceId) -> Result<Option<Resource>, StorageError> {
        let guard = self.resources.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError> {
        let guard = self.resources.lock().map_err(poisoned)?;
        let mut resources: Vec<Resource> = guard.values().cloned().collect();
        resources.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(resources)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub learners: Arc<dyn LearnerRepository>,
    pub paths: Arc<dyn PathRepository>,
    pub quiz_results: Arc<dyn QuizResultRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pub progress: Arc<dyn ProgressPersistence>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            learners: Arc::new(repo.clone()),
            paths: Arc::new(repo.clone()),
            quiz_results: Arc::new(repo.clone()),
            resources: Arc::new(repo.clone()),
            progress: Arc::new(repo),
        }
    }
}
