//! Cache-aside decorator for `TranslationRepository`.
//!
//! Single-entity and aggregate reads go through the cache; list and search
//! results are too combinatorial to cache and always hit the store. Writes go
//! to the store and then drop every key the touched entity can appear under.
//! Bulk inserts clear the whole cache.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::cache_aside::CacheAside;
use super::keys;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    NewTranslation, Page, PageRequest, SearchCriteria, Translation, TranslationFilter,
    TranslationPatch,
};
use crate::domain::ports::TranslationRepository;

pub struct CachedTranslationRepository<R: TranslationRepository> {
    inner: Arc<R>,
    cache: CacheAside,
}

impl<R: TranslationRepository> CachedTranslationRepository<R> {
    pub fn new(inner: Arc<R>, cache: CacheAside) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    async fn invalidate(&self, translation: &Translation) {
        self.cache.forget(&keys::translation_keys(translation)).await;
    }
}

#[async_trait]
impl<R: TranslationRepository + 'static> TranslationRepository for CachedTranslationRepository<R> {
    async fn find(&self, id: Uuid) -> DomainResult<Option<Translation>> {
        self.cache
            .remember_optional(&keys::translation(id), || self.inner.find(id))
            .await
    }

    async fn find_with_trashed(&self, id: Uuid) -> DomainResult<Option<Translation>> {
        self.inner.find_with_trashed(id).await
    }

    async fn find_by_key_and_locale(&self, key: &str, locale: &str) -> DomainResult<Option<Translation>> {
        self.cache
            .remember_optional(&keys::translation_by_key(key, locale), || {
                self.inner.find_by_key_and_locale(key, locale)
            })
            .await
    }

    async fn list(&self, filter: &TranslationFilter, page: PageRequest) -> DomainResult<Page<Translation>> {
        self.inner.list(filter, page).await
    }

    async fn search(&self, criteria: &SearchCriteria) -> DomainResult<Page<Translation>> {
        self.inner.search(criteria).await
    }

    async fn create(&self, data: NewTranslation) -> DomainResult<Translation> {
        let created = self.inner.create(data).await?;
        // Aggregates (locale lists, tag lists, available locales) now miss a row.
        self.invalidate(&created).await;
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: TranslationPatch) -> DomainResult<Option<Translation>> {
        let Some(before) = self.inner.find(id).await? else {
            return Ok(None);
        };

        let updated = self.inner.update(id, patch).await?;

        self.invalidate(&before).await;
        if let Some(after) = &updated {
            self.invalidate(after).await;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let Some(existing) = self.inner.find(id).await? else {
            return Ok(false);
        };

        // Cleared before the write: a failure in between leaves a cold cache,
        // never a stale one.
        self.invalidate(&existing).await;
        self.inner.delete(id).await
    }

    async fn get_by_locale(&self, locale: &str) -> DomainResult<Vec<Translation>> {
        self.cache
            .remember(&keys::translations_by_locale(locale), || self.inner.get_by_locale(locale))
            .await
    }

    async fn get_by_tags(&self, tags: &[String], locale: Option<&str>) -> DomainResult<Vec<Translation>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        self.cache
            .remember(&keys::translations_by_tags(tags, locale), || self.inner.get_by_tags(tags, locale))
            .await
    }

    async fn bulk_insert(&self, rows: Vec<NewTranslation>) -> DomainResult<u64> {
        let inserted = self.inner.bulk_insert(rows).await?;
        self.cache.flush().await;
        Ok(inserted)
    }

    async fn sync_tags(&self, id: Uuid, tag_ids: &[Uuid]) -> DomainResult<bool> {
        let Some(before) = self.inner.find(id).await? else {
            return Ok(false);
        };

        let synced = self.inner.sync_tags(id, tag_ids).await?;

        self.invalidate(&before).await;
        if let Some(after) = self.inner.find(id).await? {
            self.invalidate(&after).await;
        }
        Ok(synced)
    }

    async fn get_available_locales(&self) -> DomainResult<Vec<String>> {
        self.cache
            .remember(keys::AVAILABLE_LOCALES, || self.inner.get_available_locales())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::cache_aside::tests::BrokenCacheStore;
    use crate::adapters::cache::MokaCacheStore;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteTagRepository, SqliteTranslationRepository};
    use crate::domain::models::NewTag;
    use crate::domain::ports::{CacheStore, TagRepository};
    use std::time::Duration;

    struct Fixture {
        repo: CachedTranslationRepository<SqliteTranslationRepository>,
        store: Arc<MokaCacheStore>,
        tags: SqliteTagRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_migrated_test_pool().await.unwrap();
        let store = Arc::new(MokaCacheStore::new(1_000));
        let cache = CacheAside::new(store.clone(), Duration::from_secs(60));
        Fixture {
            repo: CachedTranslationRepository::new(Arc::new(SqliteTranslationRepository::new(pool.clone())), cache),
            store,
            tags: SqliteTagRepository::new(pool),
        }
    }

    #[tokio::test]
    async fn test_find_populates_cache() {
        let f = setup().await;
        let created = f.repo.create(NewTranslation::new("app.name", "en", "Application")).await.unwrap();
        let key = keys::translation(created.id);

        assert!(!f.store.has(&key).await.unwrap());
        let found = f.repo.find(created.id).await.unwrap().unwrap();
        assert_eq!(found.content, "Application");
        assert!(f.store.has(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_invalidates_stale_entry() {
        let f = setup().await;
        let created = f.repo.create(NewTranslation::new("app.name", "en", "Application")).await.unwrap();
        f.repo.find(created.id).await.unwrap();
        f.repo.find_by_key_and_locale("app.name", "en").await.unwrap();

        f.repo.update(created.id, TranslationPatch::content("App")).await.unwrap();

        assert_eq!(f.repo.find(created.id).await.unwrap().unwrap().content, "App");
        assert_eq!(
            f.repo.find_by_key_and_locale("app.name", "en").await.unwrap().unwrap().content,
            "App"
        );
    }

    #[tokio::test]
    async fn test_update_moving_locale_invalidates_both_sides() {
        let f = setup().await;
        let created = f.repo.create(NewTranslation::new("k", "en", "v")).await.unwrap();
        assert_eq!(f.repo.get_by_locale("en").await.unwrap().len(), 1);
        assert!(f.repo.get_by_locale("de").await.unwrap().is_empty());

        let patch = TranslationPatch { locale: Some("de".to_string()), ..Default::default() };
        f.repo.update(created.id, patch).await.unwrap();

        assert!(f.repo.get_by_locale("en").await.unwrap().is_empty());
        assert_eq!(f.repo.get_by_locale("de").await.unwrap().len(), 1);
        assert_eq!(f.repo.get_available_locales().await.unwrap(), vec!["de"]);
    }

    #[tokio::test]
    async fn test_delete_invalidates_then_hides() {
        let f = setup().await;
        let created = f.repo.create(NewTranslation::new("k", "en", "v")).await.unwrap();
        f.repo.find(created.id).await.unwrap();
        assert_eq!(f.repo.get_available_locales().await.unwrap(), vec!["en"]);

        assert!(f.repo.delete(created.id).await.unwrap());

        assert!(f.repo.find(created.id).await.unwrap().is_none());
        assert!(f.repo.get_available_locales().await.unwrap().is_empty());
        assert!(!f.repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_invalidates_aggregates() {
        let f = setup().await;
        f.repo.create(NewTranslation::new("a", "en", "A")).await.unwrap();
        assert_eq!(f.repo.get_by_locale("en").await.unwrap().len(), 1);

        f.repo.create(NewTranslation::new("b", "en", "B")).await.unwrap();
        assert_eq!(f.repo.get_by_locale("en").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tag_aggregates_follow_sync() {
        let f = setup().await;
        let mobile = f.tags.create(NewTag::named("mobile")).await.unwrap();
        let created = f.repo.create(NewTranslation::new("k", "en", "v")).await.unwrap();
        let tags = vec!["mobile".to_string()];
        assert!(f.repo.get_by_tags(&tags, None).await.unwrap().is_empty());

        assert!(f.repo.sync_tags(created.id, &[mobile.id]).await.unwrap());

        assert_eq!(f.repo.get_by_tags(&tags, None).await.unwrap().len(), 1);
        assert_eq!(f.repo.find(created.id).await.unwrap().unwrap().tag_slugs(), vec!["mobile"]);
    }

    #[tokio::test]
    async fn test_bulk_insert_clears_cache() {
        let f = setup().await;
        assert!(f.repo.get_available_locales().await.unwrap().is_empty());

        let rows = vec![NewTranslation::new("a", "en", "A"), NewTranslation::new("a", "fr", "A")];
        assert_eq!(f.repo.bulk_insert(rows).await.unwrap(), 2);

        assert_eq!(f.repo.get_available_locales().await.unwrap(), vec!["en", "fr"]);
    }

    #[tokio::test]
    async fn test_available_locales_idempotent() {
        let f = setup().await;
        f.repo.create(NewTranslation::new("a", "en", "A")).await.unwrap();

        let first = f.repo.get_available_locales().await.unwrap();
        let second = f.repo.get_available_locales().await.unwrap();
        assert_eq!(first, second);
        assert!(f.store.has(keys::AVAILABLE_LOCALES).await.unwrap());
    }

    #[tokio::test]
    async fn test_broken_cache_falls_back_to_store() {
        let pool = create_migrated_test_pool().await.unwrap();
        let cache = CacheAside::new(Arc::new(BrokenCacheStore), Duration::from_secs(60));
        let repo = CachedTranslationRepository::new(Arc::new(SqliteTranslationRepository::new(pool)), cache);

        let created = repo.create(NewTranslation::new("k", "en", "v")).await.unwrap();
        assert_eq!(repo.find(created.id).await.unwrap().unwrap().content, "v");
        assert!(repo.delete(created.id).await.unwrap());
    }
}
