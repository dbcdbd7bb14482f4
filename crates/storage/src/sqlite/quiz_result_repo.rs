use pathwise_core::model::{LearnerId, QuizResult};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::SqliteRepository;
use super::mapping::{conn, decode_list, encode_list, i64_to_u32, resource_id_from_text, ser};
use crate::repository::{QuizResultId, QuizResultRepository, StorageError};

#[async_trait::async_trait]
impl QuizResultRepository for SqliteRepository {
    async fn append_result(
        &self,
        learner_id: LearnerId,
        result: &QuizResult,
    ) -> Result<QuizResultId, StorageError> {
        insert_result_row(&self.pool, learner_id, result).await
    }

    async fn list_results(&self, learner_id: LearnerId) -> Result<Vec<QuizResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT resource_id, score, questions_answered, correct_answers, weak_topics, recorded_at
            FROM quiz_results
            WHERE learner_id = ?1
            ORDER BY recorded_at ASC, id ASC
            ",
        )
        .bind(learner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(result_from_row(&row)?);
        }
        Ok(results)
    }

    async fn count_results(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM quiz_results")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        let total: i64 = row.try_get("total").map_err(ser)?;
        u64::try_from(total).map_err(ser)
    }
}

fn result_from_row(row: &SqliteRow) -> Result<QuizResult, StorageError> {
    let weak_topics: String = row.try_get("weak_topics").map_err(ser)?;
    let answered: i64 = row.try_get("questions_answered").map_err(ser)?;
    let correct: i64 = row.try_get("correct_answers").map_err(ser)?;

    QuizResult::from_persisted(
        resource_id_from_text(row.try_get("resource_id").map_err(ser)?)?,
        row.try_get("score").map_err(ser)?,
        i64_to_u32("questions_answered", answered)?,
        i64_to_u32("correct_answers", correct)?,
        decode_list("weak_topics", &weak_topics)?,
        row.try_get("recorded_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(super) async fn insert_result_row<'e, E>(
    executor: E,
    learner_id: LearnerId,
    result: &QuizResult,
) -> Result<QuizResultId, StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        r"
        INSERT INTO quiz_results (learner_id, resource_id, score, questions_answered, correct_answers, weak_topics, recorded_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
    )
    .bind(learner_id.to_string())
    .bind(result.resource_id().as_str())
    .bind(result.score().value())
    .bind(i64::from(result.questions_answered()))
    .bind(i64::from(result.correct_answers()))
    .bind(encode_list(result.weak_topics())?)
    .bind(result.recorded_at())
    .execute(executor)
    .await
    .map_err(conn)?;

    Ok(res.last_insert_rowid())
}
