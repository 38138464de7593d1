//! Tag service.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{slugify, NewTag, Tag, TagPatch};
use crate::domain::ports::TagRepository;

pub struct TagService<G: TagRepository> {
    tags: Arc<G>,
}

impl<G: TagRepository> TagService<G> {
    pub fn new(tags: Arc<G>) -> Self {
        Self { tags }
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        self.tags.list_all().await
    }

    pub async fn find_tag(&self, id: Uuid) -> DomainResult<Option<Tag>> {
        self.tags.find(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tag>> {
        self.tags.find_by_slug(&slugify(slug)).await
    }

    pub async fn create_tag(&self, data: NewTag) -> DomainResult<Tag> {
        validate_name(&data.name)?;
        if let Some(slug) = &data.slug {
            validate_slug(slug)?;
        }
        self.tags.create(data).await
    }

    /// Merge a patch over a tag. `None` when it does not exist.
    pub async fn update_tag(&self, id: Uuid, patch: TagPatch) -> DomainResult<Option<Tag>> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(slug) = &patch.slug {
            validate_slug(slug)?;
        }
        self.tags.update(id, patch).await
    }

    /// Soft-delete a tag. `false` when it does not exist.
    pub async fn delete_tag(&self, id: Uuid) -> DomainResult<bool> {
        self.tags.delete(id).await
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if slugify(name).is_empty() {
        return Err(DomainError::ValidationFailed(format!(
            "tag name {name:?} has no letters or digits"
        )));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> DomainResult<()> {
    if slugify(slug).is_empty() {
        return Err(DomainError::ValidationFailed(format!("invalid tag slug {slug:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteTagRepository};

    async fn setup_service() -> TagService<SqliteTagRepository> {
        let pool = create_migrated_test_pool().await.unwrap();
        TagService::new(Arc::new(SqliteTagRepository::new(pool)))
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_raw_slug() {
        let service = setup_service().await;
        let tag = service.create_tag(NewTag::named("Check Out")).await.unwrap();

        let found = service.find_by_slug("Check Out").await.unwrap().unwrap();
        assert_eq!(found.id, tag.id);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = setup_service().await;
        let result = service.create_tag(NewTag::named("  !! ")).await;
        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = setup_service().await;
        let tag = service.create_tag(NewTag::named("web")).await.unwrap();

        let patch = TagPatch { description: Some("Browser".to_string()), ..Default::default() };
        let updated = service.update_tag(tag.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.description.as_deref(), Some("Browser"));

        assert!(service.delete_tag(tag.id).await.unwrap());
        assert!(service.list_tags().await.unwrap().is_empty());
    }
}
