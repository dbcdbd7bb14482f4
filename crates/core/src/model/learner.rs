use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::LearnerId;
use crate::model::labels::normalize_labels;
use crate::model::style::LearningStyle;
use crate::model::subject::Subject;

//
// ─── KNOWLEDGE LEVEL ───────────────────────────────────────────────────────────
//

/// Self-assessed knowledge level, 1 (beginner) to 5 (expert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct KnowledgeLevel(u8);

impl KnowledgeLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `LearnerFieldError::KnowledgeLevelOutOfRange` outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, LearnerFieldError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(LearnerFieldError::KnowledgeLevelOutOfRange(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for KnowledgeLevel {
    type Error = LearnerFieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<KnowledgeLevel> for u8 {
    fn from(level: KnowledgeLevel) -> Self {
        level.0
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

/// Profile form fields that can carry an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerField {
    Name,
    LearningStyle,
    Subject,
    KnowledgeLevel,
}

impl LearnerField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LearnerField::Name => "name",
            LearnerField::LearningStyle => "learning_style",
            LearnerField::Subject => "subject",
            LearnerField::KnowledgeLevel => "knowledge_level",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LearnerFieldError {
    #[error("Name is required")]
    NameRequired,

    #[error("Learning style is required")]
    LearningStyleRequired,

    #[error("Unknown learning style: {0}")]
    UnknownLearningStyle(String),

    #[error("Subject is required")]
    SubjectRequired,

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Knowledge level must be between 1 and 5")]
    KnowledgeLevelOutOfRange(i64),
}

impl LearnerFieldError {
    #[must_use]
    pub fn field(&self) -> LearnerField {
        match self {
            LearnerFieldError::NameRequired => LearnerField::Name,
            LearnerFieldError::LearningStyleRequired
            | LearnerFieldError::UnknownLearningStyle(_) => LearnerField::LearningStyle,
            LearnerFieldError::SubjectRequired | LearnerFieldError::UnknownSubject(_) => {
                LearnerField::Subject
            }
            LearnerFieldError::KnowledgeLevelOutOfRange(_) => LearnerField::KnowledgeLevel,
        }
    }
}

/// Every field error found in a profile draft, at most one per field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid learner profile: {} field(s) need attention", .errors.len())]
pub struct LearnerValidationErrors {
    errors: Vec<LearnerFieldError>,
}

impl LearnerValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[LearnerFieldError] {
        &self.errors
    }

    #[must_use]
    pub fn get(&self, field: LearnerField) -> Option<&LearnerFieldError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// Field → message map, ready for inline display next to each input.
    #[must_use]
    pub fn field_messages(&self) -> BTreeMap<LearnerField, String> {
        self.errors
            .iter()
            .map(|e| (e.field(), e.to_string()))
            .collect()
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw profile-creation input, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LearnerDraft {
    pub name: String,
    pub learning_style: String,
    pub subject: String,
    pub knowledge_level: i64,
    #[serde(default)]
    pub weak_areas: Vec<String>,
}

impl LearnerDraft {
    /// Validate every field and collect all failures.
    ///
    /// # Errors
    ///
    /// Returns `LearnerValidationErrors` listing each invalid field.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedLearner, LearnerValidationErrors> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(LearnerFieldError::NameRequired);
        }

        let learning_style = if self.learning_style.trim().is_empty() {
            errors.push(LearnerFieldError::LearningStyleRequired);
            None
        } else {
            match self.learning_style.parse::<LearningStyle>() {
                Ok(style) => Some(style),
                Err(_) => {
                    errors.push(LearnerFieldError::UnknownLearningStyle(
                        self.learning_style.trim().to_string(),
                    ));
                    None
                }
            }
        };

        let subject = if self.subject.trim().is_empty() {
            errors.push(LearnerFieldError::SubjectRequired);
            None
        } else {
            match self.subject.parse::<Subject>() {
                Ok(subject) => Some(subject),
                Err(_) => {
                    errors.push(LearnerFieldError::UnknownSubject(
                        self.subject.trim().to_string(),
                    ));
                    None
                }
            }
        };

        let knowledge_level = match KnowledgeLevel::new(self.knowledge_level) {
            Ok(level) => Some(level),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match (learning_style, subject, knowledge_level) {
            (Some(learning_style), Some(subject), Some(knowledge_level)) if errors.is_empty() => {
                Ok(ValidatedLearner {
                    name,
                    learning_style,
                    subject,
                    knowledge_level,
                    weak_areas: normalize_labels(self.weak_areas),
                    created_at: now,
                })
            }
            _ => Err(LearnerValidationErrors { errors }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLearner {
    name: String,
    learning_style: LearningStyle,
    subject: Subject,
    knowledge_level: KnowledgeLevel,
    weak_areas: Vec<String>,
    created_at: DateTime<Utc>,
}

impl ValidatedLearner {
    #[must_use]
    pub fn assign_id(self, id: LearnerId) -> Learner {
        Learner {
            id,
            name: self.name,
            learning_style: self.learning_style,
            subject: self.subject,
            knowledge_level: self.knowledge_level,
            weak_areas: self.weak_areas,
            created_at: self.created_at,
        }
    }
}

//
// ─── LEARNER ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    id: LearnerId,
    name: String,
    learning_style: LearningStyle,
    subject: Subject,
    knowledge_level: KnowledgeLevel,
    weak_areas: Vec<String>,
    created_at: DateTime<Utc>,
}

impl Learner {
    /// Rehydrate a learner from storage.
    ///
    /// # Errors
    ///
    /// Returns `LearnerFieldError::NameRequired` if the stored name is blank.
    pub fn from_persisted(
        id: LearnerId,
        name: String,
        learning_style: LearningStyle,
        subject: Subject,
        knowledge_level: KnowledgeLevel,
        weak_areas: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, LearnerFieldError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LearnerFieldError::NameRequired);
        }
        Ok(Self {
            id,
            name,
            learning_style,
            subject,
            knowledge_level,
            weak_areas: normalize_labels(weak_areas),
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> LearnerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn learning_style(&self) -> LearningStyle {
        self.learning_style
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn knowledge_level(&self) -> KnowledgeLevel {
        self.knowledge_level
    }

    #[must_use]
    pub fn weak_areas(&self) -> &[String] {
        &self.weak_areas
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
