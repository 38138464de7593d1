//! Translation repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    NewTranslation, Page, PageRequest, SearchCriteria, Translation, TranslationFilter,
    TranslationPatch,
};

/// Number of rows written per statement by [`TranslationRepository::bulk_insert`].
pub const BULK_INSERT_BATCH_SIZE: usize = 1000;

/// Repository interface for Translation persistence.
///
/// Every read returns translations with their live tags attached and ignores
/// soft-deleted rows unless stated otherwise. Absence is reported through
/// `Option`/`bool`, never as an error.
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Get a live translation by ID.
    async fn find(&self, id: Uuid) -> DomainResult<Option<Translation>>;

    /// Get a translation by ID, including soft-deleted rows.
    async fn find_with_trashed(&self, id: Uuid) -> DomainResult<Option<Translation>>;

    /// Get the live translation for a `(key, locale)` pair.
    async fn find_by_key_and_locale(&self, key: &str, locale: &str) -> DomainResult<Option<Translation>>;

    /// List live translations matching `filter`, newest first.
    async fn list(&self, filter: &TranslationFilter, page: PageRequest) -> DomainResult<Page<Translation>>;

    /// Like [`list`](Self::list), plus an optional full-text predicate over content.
    async fn search(&self, criteria: &SearchCriteria) -> DomainResult<Page<Translation>>;

    /// Insert a translation and, when tag ids are supplied, set its associations.
    async fn create(&self, data: NewTranslation) -> DomainResult<Translation>;

    /// Merge `patch` over a live translation. `None` when it does not exist.
    async fn update(&self, id: Uuid, patch: TranslationPatch) -> DomainResult<Option<Translation>>;

    /// Soft-delete a live translation. `false` when it does not exist.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// All live translations in one locale.
    async fn get_by_locale(&self, locale: &str) -> DomainResult<Vec<Translation>>;

    /// Live translations carrying at least one of the tag slugs, optionally
    /// restricted to one locale.
    async fn get_by_tags(&self, tags: &[String], locale: Option<&str>) -> DomainResult<Vec<Translation>>;

    /// Insert many rows in one all-or-nothing transaction. Returns the row count.
    ///
    /// `tag_ids` on the rows are not written; bulk rows are stored untagged.
    async fn bulk_insert(&self, rows: Vec<NewTranslation>) -> DomainResult<u64>;

    /// Replace the association set of a live translation. `false` when it does
    /// not exist.
    async fn sync_tags(&self, id: Uuid, tag_ids: &[Uuid]) -> DomainResult<bool>;

    /// Distinct locales among live translations, sorted.
    async fn get_available_locales(&self) -> DomainResult<Vec<String>>;
}
