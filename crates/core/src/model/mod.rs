mod ids;
mod labels;
mod learner;
mod path;
mod quiz;
mod resource;
mod settings;
mod style;
mod subject;

pub use ids::{LearnerId, ParseIdError, PathId, ResourceId};
pub(crate) use labels::normalize_labels;

pub use learner::{
    KnowledgeLevel, Learner, LearnerDraft, LearnerField, LearnerFieldError,
    LearnerValidationErrors, ValidatedLearner,
};
pub use path::LearningPath;
pub use quiz::{QuizResult, QuizResultDraft, QuizResultError, Score, ScoreBand};
pub use resource::{Difficulty, Resource, ResourceCatalog, ResourceError, ResourceKind};
pub use settings::{DisplaySettings, DisplaySettingsDraft, SettingsError};
pub use style::{LearningStyle, StyleAffinity, StyleError};
pub use subject::{Subject, SubjectError};
