#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, LearnerRepository, PathRepository, ProgressPersistence, QuizResultId,
    QuizResultRepository, ResourceRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
