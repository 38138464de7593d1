//! Translation service: tag resolution on writes and the cached export tier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::cache::{keys, CacheAside};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    slugify, LocaleMessages, NewTranslation, Page, PageRequest, SearchCriteria, Translation,
    TranslationExport, TranslationFilter, TranslationInput, TranslationPatch, TranslationUpdate,
};
use crate::domain::ports::{TagRepository, TranslationRepository};

/// Export payload as stored in the cache.
///
/// The public export type is serialised untagged, which cannot tell an empty
/// flat map from an empty grouped one on the way back in.
#[derive(Serialize, Deserialize)]
#[serde(tag = "shape", content = "messages", rename_all = "snake_case")]
enum CachedExport {
    Flat(LocaleMessages),
    ByLocale(BTreeMap<String, LocaleMessages>),
}

impl From<CachedExport> for TranslationExport {
    fn from(cached: CachedExport) -> Self {
        match cached {
            CachedExport::Flat(messages) => Self::Flat(messages),
            CachedExport::ByLocale(groups) => Self::ByLocale(groups),
        }
    }
}

impl From<&TranslationExport> for CachedExport {
    fn from(export: &TranslationExport) -> Self {
        match export {
            TranslationExport::Flat(messages) => Self::Flat(messages.clone()),
            TranslationExport::ByLocale(groups) => Self::ByLocale(groups.clone()),
        }
    }
}

pub struct TranslationService<T: TranslationRepository, G: TagRepository> {
    translations: Arc<T>,
    tags: Arc<G>,
    export_cache: CacheAside,
}

impl<T: TranslationRepository, G: TagRepository> TranslationService<T, G> {
    /// `export_cache` carries the TTL used for export entries.
    pub fn new(translations: Arc<T>, tags: Arc<G>, export_cache: CacheAside) -> Self {
        Self {
            translations,
            tags,
            export_cache,
        }
    }

    /// Create a translation, resolving tag names to tags (creating missing ones).
    pub async fn create_translation(&self, input: TranslationInput) -> DomainResult<Translation> {
        validate_key_and_locale(&input.key, &input.locale)?;

        let tag_ids = match &input.tags {
            Some(names) => Some(self.resolve_tag_ids(names).await?),
            None => None,
        };

        let created = self
            .translations
            .create(NewTranslation {
                key: input.key,
                locale: input.locale,
                content: input.content,
                tag_ids,
            })
            .await?;

        self.invalidate_exports_for(&created).await;
        Ok(created)
    }

    /// Merge an update over a translation. `None` when it does not exist.
    ///
    /// Tags are re-resolved only when supplied; an empty list clears them.
    pub async fn update_translation(
        &self,
        id: Uuid,
        update: TranslationUpdate,
    ) -> DomainResult<Option<Translation>> {
        if update.key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(DomainError::ValidationFailed("key must not be empty".to_string()));
        }
        if update.locale.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(DomainError::ValidationFailed("locale must not be empty".to_string()));
        }

        let Some(before) = self.translations.find(id).await? else {
            return Ok(None);
        };

        let tag_ids = match &update.tags {
            Some(names) => Some(self.resolve_tag_ids(names).await?),
            None => None,
        };

        let patch = TranslationPatch {
            key: update.key,
            locale: update.locale,
            content: update.content,
            tag_ids,
        };
        let updated = self.translations.update(id, patch).await?;

        self.invalidate_exports_for(&before).await;
        if let Some(after) = &updated {
            self.invalidate_exports_for(after).await;
        }
        Ok(updated)
    }

    /// Soft-delete a translation. `false` when it does not exist.
    pub async fn delete_translation(&self, id: Uuid) -> DomainResult<bool> {
        let Some(existing) = self.translations.find(id).await? else {
            return Ok(false);
        };

        let deleted = self.translations.delete(id).await?;
        if deleted {
            self.invalidate_exports_for(&existing).await;
        }
        Ok(deleted)
    }

    pub async fn find_translation(&self, id: Uuid) -> DomainResult<Option<Translation>> {
        self.translations.find(id).await
    }

    pub async fn find_by_key(&self, key: &str, locale: &str) -> DomainResult<Option<Translation>> {
        self.translations.find_by_key_and_locale(key, locale).await
    }

    pub async fn list_translations(
        &self,
        filter: &TranslationFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Translation>> {
        self.translations.list(filter, page).await
    }

    pub async fn search_translations(&self, criteria: &SearchCriteria) -> DomainResult<Page<Translation>> {
        self.translations.search(criteria).await
    }

    pub async fn available_locales(&self) -> DomainResult<Vec<String>> {
        self.translations.get_available_locales().await
    }

    /// Insert many translations in one transaction. Tag names on the inputs
    /// are ignored; bulk rows are stored untagged.
    pub async fn bulk_import(&self, rows: Vec<TranslationInput>) -> DomainResult<u64> {
        for row in &rows {
            validate_key_and_locale(&row.key, &row.locale)?;
        }

        let rows = rows
            .into_iter()
            .map(|row| NewTranslation::new(row.key, row.locale, row.content))
            .collect();

        let inserted = self.translations.bulk_insert(rows).await?;
        info!(rows = inserted, "bulk import complete");
        Ok(inserted)
    }

    /// Export translations as key/content maps.
    ///
    /// Tags take priority: with tags the export is every translation carrying
    /// at least one of them (restricted to `locale` when given). With only a
    /// locale it is that locale's translations. With neither it is grouped by
    /// every known locale. Results are cached per filter combination.
    pub async fn export_translations(
        &self,
        locale: Option<&str>,
        tags: Option<&[String]>,
    ) -> DomainResult<TranslationExport> {
        let tags = normalize_tags(tags.unwrap_or_default());
        let key = keys::export(locale, tags.as_slice());

        // Not atomic: concurrent misses on the same key each rebuild and
        // write the same value.
        if self.export_cache.exists(&key).await {
            if let Some(cached) = self.export_cache.read::<CachedExport>(&key).await {
                debug!(key = %key, "export served from cache");
                return Ok(cached.into());
            }
        }

        let export = if !tags.is_empty() {
            let rows = self.translations.get_by_tags(&tags, locale).await?;
            TranslationExport::Flat(TranslationExport::flatten(rows))
        } else if let Some(locale) = locale {
            let rows = self.translations.get_by_locale(locale).await?;
            TranslationExport::Flat(TranslationExport::flatten(rows))
        } else {
            let mut groups = BTreeMap::new();
            for locale in self.translations.get_available_locales().await? {
                let rows = self.translations.get_by_locale(&locale).await?;
                groups.insert(locale, TranslationExport::flatten(rows));
            }
            TranslationExport::ByLocale(groups)
        };

        self.export_cache.write(&key, &CachedExport::from(&export)).await;
        Ok(export)
    }

    /// Drop the unfiltered export of one locale, or with no locale, the
    /// entire cache.
    pub async fn invalidate_export_cache(&self, locale: Option<&str>) {
        match locale {
            Some(locale) => {
                self.export_cache.forget(&[keys::export::<&str>(Some(locale), &[])]).await;
            }
            None => self.export_cache.flush().await,
        }
    }

    async fn resolve_tag_ids(&self, names: &[String]) -> DomainResult<Vec<Uuid>> {
        if let Some(blank) = names.iter().find(|n| slugify(n).is_empty()) {
            return Err(DomainError::ValidationFailed(format!("invalid tag name: {blank:?}")));
        }

        let mut ids: Vec<Uuid> = Vec::with_capacity(names.len());
        for tag in self.tags.find_or_create_by_names(names).await? {
            if !ids.contains(&tag.id) {
                ids.push(tag.id);
            }
        }
        Ok(ids)
    }

    async fn invalidate_exports_for(&self, translation: &Translation) {
        self.export_cache.forget(&keys::export_keys(translation)).await;
    }
}

fn validate_key_and_locale(key: &str, locale: &str) -> DomainResult<()> {
    if key.trim().is_empty() {
        return Err(DomainError::ValidationFailed("key must not be empty".to_string()));
    }
    if locale.trim().is_empty() {
        return Err(DomainError::ValidationFailed("locale must not be empty".to_string()));
    }
    Ok(())
}

/// Slugify, drop blanks, sort and deduplicate export tags.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut slugs: Vec<String> = tags.iter().map(|t| slugify(t)).filter(|s| !s.is_empty()).collect();
    slugs.sort();
    slugs.dedup();
    slugs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{CachedTagRepository, CachedTranslationRepository, MokaCacheStore};
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteTagRepository, SqliteTranslationRepository};
    use crate::domain::ports::CacheStore;
    use std::time::Duration;

    type Service = TranslationService<
        CachedTranslationRepository<SqliteTranslationRepository>,
        CachedTagRepository<SqliteTagRepository>,
    >;

    async fn setup() -> (Service, Arc<MokaCacheStore>) {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = Arc::new(MokaCacheStore::new(1_000));
        let cache = CacheAside::new(store.clone(), Duration::from_secs(60));

        let translations = Arc::new(CachedTranslationRepository::new(
            Arc::new(SqliteTranslationRepository::new(pool.clone())),
            cache.clone(),
        ));
        let tags = Arc::new(CachedTagRepository::new(Arc::new(SqliteTagRepository::new(pool)), cache.clone()));

        (TranslationService::new(translations, tags, cache), store)
    }

    #[tokio::test]
    async fn test_create_resolves_tag_names() {
        let (service, _) = setup().await;

        let created = service
            .create_translation(TranslationInput::new("k", "en", "v").with_tags(["Mobile", "web", "mobile"]))
            .await
            .unwrap();

        assert_eq!(created.tag_slugs(), vec!["mobile", "web"]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_key() {
        let (service, _) = setup().await;
        let result = service.create_translation(TranslationInput::new("  ", "en", "v")).await;
        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_update_without_tags_keeps_them() {
        let (service, _) = setup().await;
        let created = service
            .create_translation(TranslationInput::new("k", "en", "v").with_tags(["mobile"]))
            .await
            .unwrap();

        let update = TranslationUpdate { content: Some("v2".to_string()), ..Default::default() };
        let updated = service.update_translation(created.id, update).await.unwrap().unwrap();
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.tag_slugs(), vec!["mobile"]);

        let clear = TranslationUpdate { tags: Some(vec![]), ..Default::default() };
        let cleared = service.update_translation(created.id, clear).await.unwrap().unwrap();
        assert!(cleared.tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let (service, _) = setup().await;
        let update = TranslationUpdate { content: Some("x".to_string()), ..Default::default() };
        assert!(service.update_translation(Uuid::new_v4(), update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_export_shapes() {
        let (service, _) = setup().await;
        service.create_translation(TranslationInput::new("greeting", "en", "Hello").with_tags(["web"])).await.unwrap();
        service.create_translation(TranslationInput::new("greeting", "fr", "Bonjour")).await.unwrap();

        let en = service.export_translations(Some("en"), None).await.unwrap();
        assert_eq!(en.as_flat().unwrap()["greeting"], "Hello");

        let all = service.export_translations(None, None).await.unwrap();
        let groups = all.as_by_locale().unwrap();
        assert_eq!(groups["en"]["greeting"], "Hello");
        assert_eq!(groups["fr"]["greeting"], "Bonjour");

        let web = service.export_translations(Some("fr"), Some(&["web".to_string()])).await.unwrap();
        assert!(web.as_flat().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_tags_take_priority_over_locale_only() {
        let (service, _) = setup().await;
        service.create_translation(TranslationInput::new("a", "en", "A").with_tags(["web"])).await.unwrap();
        service.create_translation(TranslationInput::new("b", "en", "B")).await.unwrap();

        let export = service.export_translations(Some("en"), Some(&["Web".to_string()])).await.unwrap();
        let flat = export.as_flat().unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["a"], "A");
    }

    #[tokio::test]
    async fn test_export_is_cached_and_invalidated_by_writes() {
        let (service, store) = setup().await;
        let created = service.create_translation(TranslationInput::new("a", "en", "A")).await.unwrap();

        service.export_translations(Some("en"), None).await.unwrap();
        assert!(store.has("export.locale.en").await.unwrap());

        let update = TranslationUpdate { content: Some("A2".to_string()), ..Default::default() };
        service.update_translation(created.id, update).await.unwrap();
        assert!(!store.has("export.locale.en").await.unwrap());

        let export = service.export_translations(Some("en"), None).await.unwrap();
        assert_eq!(export.as_flat().unwrap()["a"], "A2");
    }

    #[tokio::test]
    async fn test_empty_flat_export_survives_cache_roundtrip() {
        let (service, _) = setup().await;

        let first = service.export_translations(Some("xx"), None).await.unwrap();
        let second = service.export_translations(Some("xx"), None).await.unwrap();

        assert_eq!(first, TranslationExport::Flat(LocaleMessages::new()));
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_invalidate_export_cache() {
        let (service, store) = setup().await;
        service.create_translation(TranslationInput::new("a", "en", "A")).await.unwrap();
        service.export_translations(Some("en"), None).await.unwrap();
        service.export_translations(None, None).await.unwrap();

        service.invalidate_export_cache(Some("en")).await;
        assert!(!store.has("export.locale.en").await.unwrap());
        assert!(store.has("export").await.unwrap());

        service.invalidate_export_cache(None).await;
        assert!(!store.has("export").await.unwrap());
        assert_eq!(store.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_translation() {
        let (service, _) = setup().await;
        let created = service.create_translation(TranslationInput::new("a", "en", "A")).await.unwrap();

        assert!(service.delete_translation(created.id).await.unwrap());
        assert!(service.find_translation(created.id).await.unwrap().is_none());
        assert!(!service.delete_translation(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_bulk_import() {
        let (service, _) = setup().await;
        let rows = vec![TranslationInput::new("a", "en", "A"), TranslationInput::new("a", "de", "A")];

        assert_eq!(service.bulk_import(rows).await.unwrap(), 2);
        assert_eq!(service.available_locales().await.unwrap(), vec!["de", "en"]);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec!["Web".to_string(), "mobile".to_string(), "web".to_string(), "!!".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["mobile", "web"]);
    }
}
