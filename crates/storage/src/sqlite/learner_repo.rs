use pathwise_core::model::{KnowledgeLevel, Learner, LearnerId, LearningStyle, Subject};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::SqliteRepository;
use super::mapping::{conn, decode_list, encode_list, learner_id_from_text, ser};
use crate::repository::{LearnerRepository, StorageError};

#[async_trait::async_trait]
impl LearnerRepository for SqliteRepository {
    async fn insert_learner(&self, learner: &Learner) -> Result<(), StorageError> {
        insert_learner_row(&self.pool, learner).await
    }

    async fn get_learner(&self, id: LearnerId) -> Result<Option<Learner>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, learning_style, subject, knowledge_level, weak_areas, created_at
            FROM learners WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(learner_from_row).transpose()
    }

    async fn list_learners(&self) -> Result<Vec<Learner>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, learning_style, subject, knowledge_level, weak_areas, created_at
            FROM learners
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut learners = Vec::with_capacity(rows.len());
        for row in rows {
            learners.push(learner_from_row(&row)?);
        }
        Ok(learners)
    }
}

fn learner_from_row(row: &SqliteRow) -> Result<Learner, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let style: String = row.try_get("learning_style").map_err(ser)?;
    let subject: String = row.try_get("subject").map_err(ser)?;
    let level: i64 = row.try_get("knowledge_level").map_err(ser)?;
    let weak_areas: String = row.try_get("weak_areas").map_err(ser)?;

    Learner::from_persisted(
        learner_id_from_text(&id)?,
        row.try_get("name").map_err(ser)?,
        style.parse::<LearningStyle>().map_err(ser)?,
        subject.parse::<Subject>().map_err(ser)?,
        KnowledgeLevel::new(level).map_err(ser)?,
        decode_list("weak_areas", &weak_areas)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(super) async fn insert_learner_row<'e, E>(
    executor: E,
    learner: &Learner,
) -> Result<(), StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO learners (id, name, learning_style, subject, knowledge_level, weak_areas, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
    )
    .bind(learner.id().to_string())
    .bind(learner.name())
    .bind(learner.learning_style().as_str())
    .bind(learner.subject().as_str())
    .bind(i64::from(learner.knowledge_level().value()))
    .bind(encode_list(learner.weak_areas())?)
    .bind(learner.created_at())
    .execute(executor)
    .await
    .map_err(conn)?;

    Ok(())
}
