use pathwise_core::model::{Difficulty, Resource, ResourceId, ResourceKind, StyleAffinity};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{conn, decode_list, encode_list, resource_id_from_text, ser};
use crate::repository::{ResourceRepository, StorageError};

#[async_trait::async_trait]
impl ResourceRepository for SqliteRepository {
    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO resources (id, title, kind, topic, difficulty, style, content_url, prerequisites)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                kind = excluded.kind,
                topic = excluded.topic,
                difficulty = excluded.difficulty,
                style = excluded.style,
                content_url = excluded.content_url,
                prerequisites = excluded.prerequisites
            ",
        )
        .bind(resource.id.as_str())
        .bind(resource.title.as_str())
        .bind(resource.kind.as_str())
        .bind(resource.topic.as_str())
        .bind(i64::from(resource.difficulty.value()))
        .bind(resource.style.as_str())
        .bind(resource.content_url.as_deref())
        .bind(encode_list(&resource.prerequisites)?)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_resource(&self, id: &ResourceId) -> Result<Option<Resource>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, kind, topic, difficulty, style, content_url, prerequisites
            FROM resources WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(resource_from_row).transpose()
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, kind, topic, difficulty, style, content_url, prerequisites
            FROM resources
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut resources = Vec::with_capacity(rows.len());
        for row in rows {
            resources.push(resource_from_row(&row)?);
        }
        Ok(resources)
    }
}

fn resource_from_row(row: &SqliteRow) -> Result<Resource, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let style: String = row.try_get("style").map_err(ser)?;
    let difficulty: i64 = row.try_get("difficulty").map_err(ser)?;
    let prerequisites: String = row.try_get("prerequisites").map_err(ser)?;
    let content_url: Option<String> = row.try_get("content_url").map_err(ser)?;

    let mut resource = Resource::new(
        resource_id_from_text(row.try_get("id").map_err(ser)?)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        kind.parse::<ResourceKind>().map_err(ser)?,
        row.try_get::<String, _>("topic").map_err(ser)?,
        Difficulty::new(difficulty).map_err(ser)?,
        style.parse::<StyleAffinity>().map_err(ser)?,
    )
    .map_err(ser)?
    .with_prerequisites(decode_list::<String>("prerequisites", &prerequisites)?);
    if let Some(url) = content_url {
        resource = resource.with_content_url(url);
    }
    Ok(resource)
}
