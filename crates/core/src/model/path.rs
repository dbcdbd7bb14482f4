use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityWarning;
use crate::model::ids::{LearnerId, PathId, ResourceId};

/// Ordered resources assigned to a learner, plus a cursor marking progress.
///
/// Indices below the cursor are completed, the index at the cursor is the
/// current resource, and indices above it are upcoming. A cursor equal to the
/// length means the path is finished.
///
/// Persisted cursors beyond the length are accepted so that corrupt rows stay
/// readable; every read through [`LearningPath::current_position`] clamps them
/// and logs a [`DataIntegrityWarning`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    id: PathId,
    learner_id: LearnerId,
    resources: Vec<ResourceId>,
    current_position: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LearningPath {
    /// A fresh path positioned at its first resource.
    #[must_use]
    pub fn new(
        id: PathId,
        learner_id: LearnerId,
        resources: Vec<ResourceId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            learner_id,
            resources,
            current_position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a path from storage without rejecting an out-of-range cursor.
    #[must_use]
    pub fn from_persisted(
        id: PathId,
        learner_id: LearnerId,
        resources: Vec<ResourceId>,
        current_position: usize,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            learner_id,
            resources,
            current_position,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> PathId {
        self.id
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn resource_ids(&self) -> &[ResourceId] {
        &self.resources
    }

    #[must_use]
    pub fn resource_at(&self, index: usize) -> Option<&ResourceId> {
        self.resources.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The cursor exactly as stored, possibly past the end.
    #[must_use]
    pub fn raw_position(&self) -> usize {
        self.current_position
    }

    /// Describes an out-of-range cursor, if any.
    #[must_use]
    pub fn integrity_warning(&self) -> Option<DataIntegrityWarning> {
        (self.current_position > self.len()).then(|| DataIntegrityWarning::PositionPastEnd {
            path_id: self.id,
            position: self.current_position,
            length: self.len(),
        })
    }

    /// The cursor clamped into `0..=len`. Silent; callers that derive a
    /// view report `integrity_warning` once themselves.
    #[must_use]
    pub fn current_position(&self) -> usize {
        self.current_position.min(self.len())
    }

    /// True once every resource has been completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_position() == self.len()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move the cursor one step forward, stopping at the end.
    ///
    /// Returns `true` if the cursor moved.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        let position = self.current_position();
        if position >= self.len() {
            self.current_position = position;
            return false;
        }
        self.current_position = position + 1;
        self.updated_at = now;
        true
    }
}
