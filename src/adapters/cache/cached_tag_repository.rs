//! Cache-aside decorator for `TagRepository`.
//!
//! Creation only drops `tags.all`. Updates and deletes also drop the tag's own
//! id and slug entries (old and new slug on a rename), so a renamed or deleted
//! tag is never served from cache.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::cache_aside::CacheAside;
use super::keys;
use crate::domain::errors::DomainResult;
use crate::domain::models::{NewTag, Tag, TagPatch};
use crate::domain::ports::TagRepository;

pub struct CachedTagRepository<R: TagRepository> {
    inner: Arc<R>,
    cache: CacheAside,
}

impl<R: TagRepository> CachedTagRepository<R> {
    pub fn new(inner: Arc<R>, cache: CacheAside) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<R: TagRepository + 'static> TagRepository for CachedTagRepository<R> {
    async fn find(&self, id: Uuid) -> DomainResult<Option<Tag>> {
        self.cache
            .remember_optional(&keys::tag(id), || self.inner.find(id))
            .await
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tag>> {
        self.cache
            .remember_optional(&keys::tag_by_slug(slug), || self.inner.find_by_slug(slug))
            .await
    }

    async fn list_all(&self) -> DomainResult<Vec<Tag>> {
        self.cache
            .remember(keys::ALL_TAGS, || self.inner.list_all())
            .await
    }

    async fn create(&self, data: NewTag) -> DomainResult<Tag> {
        let created = self.inner.create(data).await?;
        self.cache.forget(&[keys::ALL_TAGS]).await;
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: TagPatch) -> DomainResult<Option<Tag>> {
        let Some(before) = self.inner.find(id).await? else {
            return Ok(None);
        };

        let updated = self.inner.update(id, patch).await?;

        self.cache.forget(&keys::tag_keys(&before)).await;
        if let Some(after) = &updated {
            self.cache.forget(&keys::tag_keys(after)).await;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let Some(existing) = self.inner.find(id).await? else {
            return Ok(false);
        };

        self.cache.forget(&keys::tag_keys(&existing)).await;
        self.inner.delete(id).await
    }
}
