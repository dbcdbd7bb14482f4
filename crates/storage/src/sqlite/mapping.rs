use pathwise_core::model::{LearnerId, PathId, ResourceId};
use uuid::Uuid;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

fn parse_uuid(field: &'static str, s: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(s).map_err(|e| StorageError::Serialization(format!("invalid {field}: {e}")))
}

pub(crate) fn learner_id_from_text(s: &str) -> Result<LearnerId, StorageError> {
    parse_uuid("learner_id", s).map(LearnerId::new)
}

pub(crate) fn path_id_from_text(s: &str) -> Result<PathId, StorageError> {
    parse_uuid("path_id", s).map(PathId::new)
}

pub(crate) fn resource_id_from_text(s: String) -> Result<ResourceId, StorageError> {
    ResourceId::new(s).map_err(ser)
}

/// Encodes a label or id list as a JSON array column.
pub(crate) fn encode_list<T: serde::Serialize>(items: &[T]) -> Result<String, StorageError> {
    serde_json::to_string(items).map_err(ser)
}

pub(crate) fn decode_list<T: serde::de::DeserializeOwned>(
    field: &'static str,
    raw: &str,
) -> Result<Vec<T>, StorageError> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::Serialization(format!("invalid {field}: {e}")))
}

pub(crate) fn usize_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn i64_to_usize(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}
