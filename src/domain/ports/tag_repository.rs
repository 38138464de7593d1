//! Tag repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{slugify, NewTag, Tag, TagPatch};

/// Repository interface for Tag persistence.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get a live tag by ID.
    async fn find(&self, id: Uuid) -> DomainResult<Option<Tag>>;

    /// Get a live tag by slug.
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tag>>;

    /// All live tags ordered by name.
    async fn list_all(&self) -> DomainResult<Vec<Tag>>;

    /// Create a tag, deriving its slug from the name when none is given.
    async fn create(&self, data: NewTag) -> DomainResult<Tag>;

    /// Merge `patch` over a live tag. `None` when it does not exist.
    async fn update(&self, id: Uuid, patch: TagPatch) -> DomainResult<Option<Tag>>;

    /// Soft-delete a live tag. `false` when it does not exist.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// Resolve tag names to tags, creating the missing ones.
    ///
    /// Returns one tag per input name, in input order; names that slugify to
    /// the same slug resolve to the same tag. A concurrent creator winning the
    /// slug race is absorbed by re-reading the slug.
    async fn find_or_create_by_names(&self, names: &[String]) -> DomainResult<Vec<Tag>> {
        let mut tags = Vec::with_capacity(names.len());

        for name in names {
            let slug = slugify(name);
            if let Some(tag) = self.find_by_slug(&slug).await? {
                tags.push(tag);
                continue;
            }

            match self.create(NewTag::named(name.clone())).await {
                Ok(tag) => tags.push(tag),
                Err(DomainError::UniqueViolation(reason)) => {
                    let tag = self
                        .find_by_slug(&slug)
                        .await?
                        .ok_or(DomainError::UniqueViolation(reason))?;
                    tags.push(tag);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(tags)
    }
}
