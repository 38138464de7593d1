//! SQLite implementation of the TagRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_datetime, parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewTag, Tag, TagPatch};
use crate::domain::ports::TagRepository;

const TAG_COLUMNS: &str = "id, name, slug, description, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn find(&self, id: Uuid) -> DomainResult<Option<Tag>> {
        let row: Option<TagRow> = sqlx::query_as(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE id = ? AND deleted_at IS NULL"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tag>> {
        let row: Option<TagRow> = sqlx::query_as(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE slug = ? AND deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_all(&self) -> DomainResult<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE deleted_at IS NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create(&self, data: NewTag) -> DomainResult<Tag> {
        let tag = Tag::new(data);

        sqlx::query(
            r#"INSERT INTO tags (id, name, slug, description, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
        .bind(tag.id.to_string())
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(format_timestamp(&tag.created_at))
        .bind(format_timestamp(&tag.updated_at))
        .execute(&self.pool)
        .await?;

        info!(tag_id = %tag.id, slug = %tag.slug, "created tag");

        self.find(tag.id)
            .await?
            .ok_or(DomainError::TagNotFound(tag.id))
    }

    async fn update(&self, id: Uuid, patch: TagPatch) -> DomainResult<Option<Tag>> {
        let Some(mut tag) = self.find(id).await? else {
            return Ok(None);
        };
        tag.apply(patch);

        sqlx::query(
            r#"UPDATE tags SET name = ?, slug = ?, description = ?, updated_at = ?
               WHERE id = ? AND deleted_at IS NULL"#
        )
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(format_timestamp(&tag.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.find(id).await
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let now = format_timestamp(&Utc::now());
        let result = sqlx::query(
            "UPDATE tags SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"
        )
        .bind(&now)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TagRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) deleted_at: Option<String>,
}

impl TryFrom<TagRow> for Tag {
    type Error = DomainError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: parse_uuid(&row.id)?,
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            deleted_at: parse_optional_datetime(row.deleted_at)?,
        })
    }
}
