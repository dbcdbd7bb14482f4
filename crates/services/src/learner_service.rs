use std::sync::Arc;

use pathwise_core::model::{
    Learner, LearnerDraft, LearnerId, LearningPath, PathId, QuizResult, QuizResultDraft,
    ResourceId,
};
use storage::repository::{LearnerRepository, PathRepository, ProgressPersistence, Storage};

use crate::Clock;
use crate::error::LearnerServiceError;

/// Outcome of recording a quiz result.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuiz {
    pub result: QuizResult,
    /// True when the result moved the path cursor forward.
    pub advanced: bool,
    /// Path cursor after recording, if the learner has a path.
    pub position: Option<usize>,
}

/// Orchestrates learner creation and quiz recording.
#[derive(Clone)]
pub struct LearnerService {
    clock: Clock,
    learners: Arc<dyn LearnerRepository>,
    paths: Arc<dyn PathRepository>,
    progress: Arc<dyn ProgressPersistence>,
}

impl LearnerService {
    #[must_use]
    pub fn new(
        clock: Clock,
        learners: Arc<dyn LearnerRepository>,
        paths: Arc<dyn PathRepository>,
        progress: Arc<dyn ProgressPersistence>,
    ) -> Self {
        Self {
            clock,
            learners,
            paths,
            progress,
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            clock,
            Arc::clone(&storage.learners),
            Arc::clone(&storage.paths),
            Arc::clone(&storage.progress),
        )
    }

    /// Validate and persist a learner with an initial learning path. Both are
    /// written together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `LearnerServiceError::InputValidation` listing every invalid field.
    /// Returns `LearnerServiceError::Storage` if persistence fails.
    pub async fn create_learner(
        &self,
        draft: LearnerDraft,
        initial_path: Vec<ResourceId>,
    ) -> Result<(Learner, LearningPath), LearnerServiceError> {
        let now = self.clock.now();
        let learner = draft.validate(now)?.assign_id(LearnerId::generate());
        let path = LearningPath::new(PathId::generate(), learner.id(), initial_path, now);
        self.progress.create_learner_with_path(&learner, &path).await?;

        tracing::info!(
            learner_id = %learner.id(),
            path_len = path.len(),
            "created learner"
        );
        Ok((learner, path))
    }

    /// Record a quiz result, advancing the path on a pass for the current resource.
    /// The result and the advanced path are written together.
    ///
    /// # Errors
    ///
    /// Returns `LearnerServiceError::LearnerNotFound` for an unknown learner.
    /// Returns `LearnerServiceError::QuizResult` if the result is invalid.
    /// Returns `LearnerServiceError::Storage` if persistence fails.
    pub async fn record_quiz_result(
        &self,
        learner_id: LearnerId,
        draft: QuizResultDraft,
    ) -> Result<RecordedQuiz, LearnerServiceError> {
        if self.learners.get_learner(learner_id).await?.is_none() {
            return Err(LearnerServiceError::LearnerNotFound);
        }

        let now = self.clock.now();
        let result = draft.validate(now)?;

        let mut path = self.paths.get_path_for_learner(learner_id).await?;
        let advanced = path.as_mut().is_some_and(|path| {
            let on_current = path
                .resource_at(path.current_position())
                .is_some_and(|id| id == result.resource_id());
            on_current && result.band().is_pass() && path.advance(now)
        });
        self.progress
            .record_quiz(learner_id, &result, path.as_ref().filter(|_| advanced))
            .await?;

        tracing::debug!(
            learner_id = %learner_id,
            score = result.score().value(),
            advanced,
            "recorded quiz result"
        );
        Ok(RecordedQuiz {
            result,
            advanced,
            position: path.as_ref().map(LearningPath::current_position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::model::{LearnerField, LearnerFieldError};
    use pathwise_core::time::fixed_clock;
    use storage::repository::{QuizResultId, QuizResultRepository, StorageError};

    fn service() -> (LearnerService, Storage) {
        let storage = Storage::in_memory();
        (LearnerService::from_storage(fixed_clock(), &storage), storage)
    }

    fn draft() -> LearnerDraft {
        LearnerDraft {
            name: "Ada".into(),
            learning_style: "visual".into(),
            subject: "algebra".into(),
            knowledge_level: 2,
            weak_areas: vec!["factoring".into()],
        }
    }

    fn quiz(resource: &str, score: f64) -> QuizResultDraft {
        QuizResultDraft {
            resource_id: ResourceId::new(resource).unwrap(),
            score,
            questions_answered: 5,
            correct_answers: 4,
            weak_topics: Vec::new(),
        }
    }

    fn ids(raw: &[&str]) -> Vec<ResourceId> {
        raw.iter().map(|r| ResourceId::new(*r).unwrap()).collect()
    }

    #[tokio::test]
    async fn create_learner_reports_every_invalid_field() {
        let (service, storage) = service();
        let err = service
            .create_learner(
                LearnerDraft {
                    name: "  ".into(),
                    learning_style: String::new(),
                    subject: "chemistry".into(),
                    knowledge_level: 9,
                    weak_areas: Vec::new(),
                },
                Vec::new(),
            )
            .await
            .unwrap_err();
        let LearnerServiceError::InputValidation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.errors().len(), 4);
        assert_eq!(
            errors.get(LearnerField::Name),
            Some(&LearnerFieldError::NameRequired)
        );
        assert!(storage.learners.list_learners().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_learner_persists_profile_and_path() {
        let (service, storage) = service();
        let (learner, path) = service
            .create_learner(draft(), ids(&["alg_001", "alg_002"]))
            .await
            .unwrap();
        assert_eq!(path.current_position(), 0);
        assert_eq!(
            storage.learners.get_learner(learner.id()).await.unwrap(),
            Some(learner.clone())
        );
        assert_eq!(
            storage.paths.get_path_for_learner(learner.id()).await.unwrap(),
            Some(path)
        );
    }

    #[tokio::test]
    async fn passing_current_resource_advances_until_done() {
        let (service, _storage) = service();
        let (learner, _) = service
            .create_learner(draft(), ids(&["alg_001", "alg_002"]))
            .await
            .unwrap();

        let first = service
            .record_quiz_result(learner.id(), quiz("alg_001", 80.0))
            .await
            .unwrap();
        assert!(first.advanced);
        assert_eq!(first.position, Some(1));

        let second = service
            .record_quiz_result(learner.id(), quiz("alg_002", 95.0))
            .await
            .unwrap();
        assert_eq!(second.position, Some(2));

        let extra = service
            .record_quiz_result(learner.id(), quiz("alg_002", 100.0))
            .await
            .unwrap();
        assert!(!extra.advanced);
        assert_eq!(extra.position, Some(2));
    }

    #[tokio::test]
    async fn failing_or_off_path_results_do_not_advance() {
        let (service, storage) = service();
        let (learner, _) = service
            .create_learner(draft(), ids(&["alg_001", "alg_002"]))
            .await
            .unwrap();

        let low = service
            .record_quiz_result(learner.id(), quiz("alg_001", 79.9))
            .await
            .unwrap();
        assert!(!low.advanced);
        let elsewhere = service
            .record_quiz_result(learner.id(), quiz("alg_002", 100.0))
            .await
            .unwrap();
        assert!(!elsewhere.advanced);
        assert_eq!(elsewhere.position, Some(0));
        assert_eq!(storage.quiz_results.count_results().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalid_result_and_unknown_learner_are_rejected() {
        let (service, storage) = service();
        let err = service
            .record_quiz_result(LearnerId::generate(), quiz("alg_001", 90.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LearnerServiceError::LearnerNotFound));

        let (learner, _) = service.create_learner(draft(), Vec::new()).await.unwrap();
        let err = service
            .record_quiz_result(learner.id(), quiz("alg_001", 101.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LearnerServiceError::QuizResult(_)));
        assert_eq!(storage.quiz_results.count_results().await.unwrap(), 0);
    }

    struct RejectingProgress;

    #[async_trait::async_trait]
    impl ProgressPersistence for RejectingProgress {
        async fn create_learner_with_path(
            &self,
            _learner: &Learner,
            _path: &LearningPath,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn record_quiz(
            &self,
            _learner_id: LearnerId,
            _result: &QuizResult,
            _advanced_path: Option<&LearningPath>,
        ) -> Result<QuizResultId, StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_no_partial_learner_or_advance() {
        let storage = Storage::in_memory();
        let (learner, _) = LearnerService::from_storage(fixed_clock(), &storage)
            .create_learner(draft(), ids(&["alg_001"]))
            .await
            .unwrap();
        let rejecting = Storage {
            progress: Arc::new(RejectingProgress),
            ..storage.clone()
        };
        let service = LearnerService::from_storage(fixed_clock(), &rejecting);

        let err = service.create_learner(draft(), Vec::new()).await.unwrap_err();
        assert!(matches!(err, LearnerServiceError::Storage(_)));
        assert_eq!(storage.learners.list_learners().await.unwrap().len(), 1);

        let err = service
            .record_quiz_result(learner.id(), quiz("alg_001", 100.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LearnerServiceError::Storage(_)));
        let path = storage.paths.get_path_for_learner(learner.id()).await.unwrap().unwrap();
        assert_eq!(path.current_position(), 0);
        assert_eq!(storage.quiz_results.count_results().await.unwrap(), 0);
    }
}
