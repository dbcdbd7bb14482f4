use thiserror::Error;

use crate::model::{PathId, ResourceId};

/// The current resource of a path could not be resolved.
///
/// Callers surface this as "no resource available", never as a failure screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFound {
    #[error("no resource at position {position} (path has {length})")]
    PositionPastEnd { position: usize, length: usize },

    #[error("resource {0} is not in the catalog")]
    MissingFromCatalog(ResourceId),
}

/// Inconsistent persisted data that derivations clamp around.
///
/// Not an error: it is logged and computation continues with a safe value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataIntegrityWarning {
    #[error("path {path_id} has position {position} beyond its {length} resources")]
    PositionPastEnd {
        path_id: PathId,
        position: usize,
        length: usize,
    },
}

impl DataIntegrityWarning {
    /// Emit the warning through `tracing`.
    pub fn log(&self) {
        match self {
            DataIntegrityWarning::PositionPastEnd {
                path_id,
                position,
                length,
            } => tracing::warn!(
                %path_id,
                position,
                length,
                "learning path position exceeds length; clamping"
            ),
        }
    }
}
