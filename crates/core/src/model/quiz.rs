use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ResourceId;
use crate::model::labels::normalize_labels;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("score must be between 0 and 100, got {0}")]
    InvalidScore(f64),

    #[error("correct answers ({correct}) exceed questions answered ({answered})")]
    CorrectExceedsAnswered { correct: u32, answered: u32 },
}

//
// ─── SCORE ────────────────────────────────────────────────────────────────────
//

/// A quiz score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidScore` for NaN or values outside `[0, 100]`.
    pub fn new(value: f64) -> Result<Self, QuizResultError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuizResultError::InvalidScore(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = QuizResultError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

//
// ─── SCORE BAND ───────────────────────────────────────────────────────────────
//

/// Three-way classification of a quiz score.
///
/// The same thresholds drive colouring and every "passed" count:
/// - `Pass`: 80 and above
/// - `Borderline`: 60 up to (not including) 80
/// - `Fail`: below 60
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Pass,
    Borderline,
    Fail,
}

impl ScoreBand {
    pub const PASS_THRESHOLD: f64 = 80.0;
    pub const BORDERLINE_THRESHOLD: f64 = 60.0;

    #[must_use]
    pub fn of(score: Score) -> Self {
        let value = score.value();
        if value >= Self::PASS_THRESHOLD {
            ScoreBand::Pass
        } else if value >= Self::BORDERLINE_THRESHOLD {
            ScoreBand::Borderline
        } else {
            ScoreBand::Fail
        }
    }

    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, ScoreBand::Pass)
    }
}

//
// ─── QUIZ RESULT ──────────────────────────────────────────────────────────────
//

/// Raw quiz outcome as reported by the grading service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizResultDraft {
    pub resource_id: ResourceId,
    pub score: f64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub weak_topics: Vec<String>,
}

impl QuizResultDraft {
    /// Validate and stamp the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` if the score is out of range or the counts disagree.
    pub fn validate(self, now: DateTime<Utc>) -> Result<QuizResult, QuizResultError> {
        QuizResult::from_persisted(
            self.resource_id,
            self.score,
            self.questions_answered,
            self.correct_answers,
            self.weak_topics,
            now,
        )
    }
}

/// Recorded quiz outcome. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    resource_id: ResourceId,
    score: Score,
    questions_answered: u32,
    correct_answers: u32,
    weak_topics: Vec<String>,
    recorded_at: DateTime<Utc>,
}

impl QuizResult {
    /// Rehydrate a result from storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` if the score is out of range or the counts disagree.
    pub fn from_persisted(
        resource_id: ResourceId,
        score: f64,
        questions_answered: u32,
        correct_answers: u32,
        weak_topics: Vec<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        let score = Score::new(score)?;
        if correct_answers > questions_answered {
            return Err(QuizResultError::CorrectExceedsAnswered {
                correct: correct_answers,
                answered: questions_answered,
            });
        }
        Ok(Self {
            resource_id,
            score,
            questions_answered,
            correct_answers,
            weak_topics: normalize_labels(weak_topics),
            recorded_at,
        })
    }

    #[must_use]
    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }

    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn weak_topics(&self) -> &[String] {
        &self.weak_topics
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
