//! SQLite implementation of the TranslationRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use super::tag_repository::TagRow;
use super::{format_timestamp, parse_datetime, parse_optional_datetime, parse_uuid, placeholders};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    NewTranslation, Page, PageRequest, SearchCriteria, Tag, Translation, TranslationFilter,
    TranslationPatch,
};
use crate::domain::ports::{TranslationRepository, BULK_INSERT_BATCH_SIZE};

const TRANSLATION_COLUMNS: &str = "id, key, locale, content, created_at, updated_at, deleted_at";

/// Newest first; rowid breaks ties between rows created in the same microsecond.
const NEWEST_FIRST: &str = " ORDER BY created_at DESC, rowid DESC";

/// Upper bound on ids per `IN (...)` when loading tags.
const TAG_LOAD_CHUNK: usize = 500;

#[derive(Clone)]
pub struct SqliteTranslationRepository {
    pool: SqlitePool,
}

impl SqliteTranslationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load rows and attach each row's live tags.
    async fn hydrate(&self, rows: Vec<TranslationRow>) -> DomainResult<Vec<Translation>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut tags = self.load_tags(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let attached = tags.remove(&row.id).unwrap_or_default();
                row.into_translation(attached)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<TranslationRow>) -> DomainResult<Option<Translation>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Tags per translation id, each list ordered by tag name.
    async fn load_tags(&self, translation_ids: &[String]) -> DomainResult<HashMap<String, Vec<Tag>>> {
        let mut by_translation: HashMap<String, Vec<Tag>> = HashMap::new();

        for chunk in translation_ids.chunks(TAG_LOAD_CHUNK) {
            let sql = format!(
                r#"SELECT tt.translation_id AS translation_id, t.id AS id, t.name AS name, t.slug AS slug,
                          t.description AS description, t.created_at AS created_at,
                          t.updated_at AS updated_at, t.deleted_at AS deleted_at
                   FROM translation_tag tt
                   INNER JOIN tags t ON t.id = tt.tag_id
                   WHERE t.deleted_at IS NULL AND tt.translation_id IN ({})
                   ORDER BY t.name ASC"#,
                placeholders(chunk.len())
            );

            let mut q = sqlx::query_as::<_, AttachedTagRow>(&sql);
            for id in chunk {
                q = q.bind(id);
            }

            for row in q.fetch_all(&self.pool).await? {
                let tag = Tag::try_from(row.tag)?;
                by_translation.entry(row.translation_id).or_default().push(tag);
            }
        }

        Ok(by_translation)
    }

    async fn fetch_one_where(&self, clause: &str, bindings: &[String]) -> DomainResult<Option<Translation>> {
        let sql = format!("SELECT {TRANSLATION_COLUMNS} FROM translations WHERE {clause}");
        let mut q = sqlx::query_as::<_, TranslationRow>(&sql);
        for binding in bindings {
            q = q.bind(binding);
        }
        let row = q.fetch_optional(&self.pool).await?;
        self.hydrate_one(row).await
    }

    /// Run a filtered, paginated query. `content` adds the full-text predicate.
    async fn paginate(
        &self,
        filter: &TranslationFilter,
        content: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<Translation>> {
        let (Some(clause), bindings) = filter_clause(filter, content) else {
            return Ok(Page::new(Vec::new(), 0, page));
        };

        let count_sql = format!("SELECT COUNT(*) FROM translations WHERE {clause}");
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_sql);
        for binding in &bindings {
            count_q = count_q.bind(binding);
        }
        let (total,) = count_q.fetch_one(&self.pool).await?;

        let sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE {clause}{NEWEST_FIRST} LIMIT {} OFFSET {}",
            page.per_page,
            page.offset()
        );
        let mut q = sqlx::query_as::<_, TranslationRow>(&sql);
        for binding in &bindings {
            q = q.bind(binding);
        }
        let rows = q.fetch_all(&self.pool).await?;
        let items = self.hydrate(rows).await?;

        Ok(Page::new(items, u64::try_from(total).unwrap_or_default(), page))
    }
}

#[async_trait]
impl TranslationRepository for SqliteTranslationRepository {
    async fn find(&self, id: Uuid) -> DomainResult<Option<Translation>> {
        self.fetch_one_where("id = ? AND deleted_at IS NULL", &[id.to_string()]).await
    }

    async fn find_with_trashed(&self, id: Uuid) -> DomainResult<Option<Translation>> {
        self.fetch_one_where("id = ?", &[id.to_string()]).await
    }

    async fn find_by_key_and_locale(&self, key: &str, locale: &str) -> DomainResult<Option<Translation>> {
        self.fetch_one_where(
            "key = ? AND locale = ? AND deleted_at IS NULL",
            &[key.to_string(), locale.to_string()],
        )
        .await
    }

    async fn list(&self, filter: &TranslationFilter, page: PageRequest) -> DomainResult<Page<Translation>> {
        self.paginate(filter, None, page).await
    }

    async fn search(&self, criteria: &SearchCriteria) -> DomainResult<Page<Translation>> {
        self.paginate(&criteria.filter, criteria.content_query(), criteria.page).await
    }

    async fn create(&self, data: NewTranslation) -> DomainResult<Translation> {
        let translation = Translation::new(data.key, data.locale, data.content);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO translations (id, key, locale, content, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
        .bind(translation.id.to_string())
        .bind(&translation.key)
        .bind(&translation.locale)
        .bind(&translation.content)
        .bind(format_timestamp(&translation.created_at))
        .bind(format_timestamp(&translation.updated_at))
        .execute(&mut *tx)
        .await?;

        if let Some(tag_ids) = &data.tag_ids {
            replace_tags(&mut tx, translation.id, tag_ids).await?;
        }

        tx.commit().await?;

        info!(
            translation_id = %translation.id,
            key = %translation.key,
            locale = %translation.locale,
            "created translation"
        );

        self.find(translation.id)
            .await?
            .ok_or(DomainError::TranslationNotFound(translation.id))
    }

    async fn update(&self, id: Uuid, patch: TranslationPatch) -> DomainResult<Option<Translation>> {
        let Some(mut translation) = self.find(id).await? else {
            return Ok(None);
        };
        translation.apply(&patch);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE translations SET key = ?, locale = ?, content = ?, updated_at = ?
               WHERE id = ? AND deleted_at IS NULL"#
        )
        .bind(&translation.key)
        .bind(&translation.locale)
        .bind(&translation.content)
        .bind(format_timestamp(&translation.updated_at))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(tag_ids) = &patch.tag_ids {
            replace_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;

        self.find(id).await
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let now = format_timestamp(&Utc::now());
        let result = sqlx::query(
            "UPDATE translations SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"
        )
        .bind(&now)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_by_locale(&self, locale: &str) -> DomainResult<Vec<Translation>> {
        let rows: Vec<TranslationRow> = sqlx::query_as(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE locale = ? AND deleted_at IS NULL ORDER BY key ASC"
        ))
        .bind(locale)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn get_by_tags(&self, tags: &[String], locale: Option<&str>) -> DomainResult<Vec<Translation>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE deleted_at IS NULL AND {}",
            has_any_tag_clause(tags.len())
        );
        if locale.is_some() {
            sql.push_str(" AND locale = ?");
        }
        sql.push_str(" ORDER BY locale ASC, key ASC");

        let mut q = sqlx::query_as::<_, TranslationRow>(&sql);
        for tag in tags {
            q = q.bind(tag);
        }
        if let Some(locale) = locale {
            q = q.bind(locale);
        }

        let rows = q.fetch_all(&self.pool).await?;
        self.hydrate(rows).await
    }

    async fn bulk_insert(&self, rows: Vec<NewTranslation>) -> DomainResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let now = format_timestamp(&Utc::now());
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for (batch, chunk) in rows.chunks(BULK_INSERT_BATCH_SIZE).enumerate() {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO translations (id, key, locale, content, created_at, updated_at) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(Uuid::new_v4().to_string())
                    .push_bind(row.key.clone())
                    .push_bind(row.locale.clone())
                    .push_bind(row.content.clone())
                    .push_bind(now.clone())
                    .push_bind(now.clone());
            });

            match builder.build().execute(&mut *tx).await {
                Ok(result) => inserted += result.rows_affected(),
                Err(err) => {
                    warn!(batch, error = %err, "bulk insert failed, rolling back");
                    tx.rollback().await?;
                    return Err(err.into());
                }
            }
        }

        tx.commit().await?;
        info!(rows = inserted, "bulk inserted translations");
        Ok(inserted)
    }

    async fn sync_tags(&self, id: Uuid, tag_ids: &[Uuid]) -> DomainResult<bool> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(String,)> =
            sqlx::query_as("SELECT id FROM translations WHERE id = ? AND deleted_at IS NULL")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        replace_tags(&mut tx, id, tag_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn get_available_locales(&self) -> DomainResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT locale FROM translations WHERE deleted_at IS NULL ORDER BY locale ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(locale,)| locale).collect())
    }
}

/// Replace the full association set of one translation.
async fn replace_tags(conn: &mut SqliteConnection, translation_id: Uuid, tag_ids: &[Uuid]) -> DomainResult<()> {
    let translation_id = translation_id.to_string();
    let now = format_timestamp(&Utc::now());

    sqlx::query("DELETE FROM translation_tag WHERE translation_id = ?")
        .bind(&translation_id)
        .execute(&mut *conn)
        .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO translation_tag (translation_id, tag_id, created_at) VALUES (?, ?, ?)")
            .bind(&translation_id)
            .bind(tag_id.to_string())
            .bind(&now)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// `EXISTS` predicate: the translation carries a live tag whose slug is one
/// of `n` bound values.
fn has_any_tag_clause(n: usize) -> String {
    format!(
        r#"EXISTS (SELECT 1 FROM translation_tag tt
                   INNER JOIN tags tg ON tg.id = tt.tag_id
                   WHERE tt.translation_id = translations.id
                     AND tg.deleted_at IS NULL
                     AND tg.slug IN ({}))"#,
        placeholders(n)
    )
}

/// Escape `LIKE` wildcards so a key fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Sanitize a search query for use with SQLite FTS5.
///
/// Every whitespace-delimited token is wrapped in double quotes (inner quotes
/// doubled), so operators such as `AND`/`NEAR` and column prefixes like
/// `content:` are matched as literal text instead of parsed as syntax.
fn sanitize_fts5_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the `WHERE` clause shared by list and search.
///
/// Returns `None` for the clause when the content query sanitizes to nothing
/// searchable, which matches no rows.
fn filter_clause(filter: &TranslationFilter, content: Option<&str>) -> (Option<String>, Vec<String>) {
    let mut clause = String::from("deleted_at IS NULL");
    let mut bindings = Vec::new();

    if let Some(locale) = &filter.locale {
        clause.push_str(" AND locale = ?");
        bindings.push(locale.clone());
    }

    if let Some(fragment) = &filter.key_contains {
        clause.push_str(r" AND key LIKE ? ESCAPE '\'");
        bindings.push(format!("%{}%", escape_like(fragment)));
    }

    if let Some(tags) = filter.tags.as_ref().filter(|t| !t.is_empty()) {
        clause.push_str(" AND ");
        clause.push_str(&has_any_tag_clause(tags.len()));
        bindings.extend(tags.iter().cloned());
    }

    if let Some(query) = content {
        let sanitized = sanitize_fts5_query(query);
        if sanitized.is_empty() {
            return (None, bindings);
        }
        clause.push_str(" AND id IN (SELECT translation_id FROM translations_fts WHERE translations_fts MATCH ?)");
        bindings.push(sanitized);
    }

    (Some(clause), bindings)
}

#[derive(sqlx::FromRow)]
struct TranslationRow {
    id: String,
    key: String,
    locale: String,
    content: String,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl TranslationRow {
    fn into_translation(self, tags: Vec<Tag>) -> DomainResult<Translation> {
        Ok(Translation {
            id: parse_uuid(&self.id)?,
            key: self.key,
            locale: self.locale,
            content: self.content,
            tags,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            deleted_at: parse_optional_datetime(self.deleted_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AttachedTagRow {
    translation_id: String,
    #[sqlx(flatten)]
    tag: TagRow,
}
