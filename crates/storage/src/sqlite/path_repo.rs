use pathwise_core::model::{LearnerId, LearningPath, ResourceId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::SqliteRepository;
use super::mapping::{
    conn, decode_list, encode_list, i64_to_usize, learner_id_from_text, path_id_from_text, ser,
    usize_to_i64,
};
use crate::repository::{PathRepository, StorageError};

#[async_trait::async_trait]
impl PathRepository for SqliteRepository {
    async fn upsert_path(&self, path: &LearningPath) -> Result<(), StorageError> {
        upsert_path_row(&self.pool, path).await
    }

    async fn get_path_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Option<LearningPath>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, learner_id, resources, current_position, created_at, updated_at
            FROM learning_paths WHERE learner_id = ?1
            ",
        )
        .bind(learner_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(path_from_row).transpose()
    }

    async fn list_paths(&self) -> Result<Vec<LearningPath>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, learner_id, resources, current_position, created_at, updated_at
            FROM learning_paths
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut paths = Vec::with_capacity(rows.len());
        for row in rows {
            paths.push(path_from_row(&row)?);
        }
        Ok(paths)
    }
}

fn path_from_row(row: &SqliteRow) -> Result<LearningPath, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let learner_id: String = row.try_get("learner_id").map_err(ser)?;
    let resources: String = row.try_get("resources").map_err(ser)?;
    let position: i64 = row.try_get("current_position").map_err(ser)?;

    Ok(LearningPath::from_persisted(
        path_id_from_text(&id)?,
        learner_id_from_text(&learner_id)?,
        decode_list::<ResourceId>("resources", &resources)?,
        i64_to_usize("current_position", position)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

pub(super) async fn upsert_path_row<'e, E>(
    executor: E,
    path: &LearningPath,
) -> Result<(), StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO learning_paths (id, learner_id, resources, current_position, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(learner_id) DO UPDATE SET
            id = excluded.id,
            resources = excluded.resources,
            current_position = excluded.current_position,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at
        ",
    )
    .bind(path.id().to_string())
    .bind(path.learner_id().to_string())
    .bind(encode_list(path.resource_ids())?)
    .bind(usize_to_i64("current_position", path.raw_position())?)
    .bind(path.created_at())
    .bind(path.updated_at())
    .execute(executor)
    .await
    .map_err(conn)?;

    Ok(())
}
