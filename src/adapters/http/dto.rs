//! Request and response bodies of the HTTP API.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::{Page, Tag, Translation, TranslationInput, TranslationUpdate};

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<T, ApiError>;

pub fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

pub fn not_found(error: DomainError) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "NOT_FOUND", error.to_string())
}

impl From<DomainError> for ErrorResponse {
    fn from(error: DomainError) -> Self {
        let code = match &error {
            DomainError::TranslationNotFound(_) | DomainError::TagNotFound(_) => "NOT_FOUND",
            DomainError::UniqueViolation(_) => "CONFLICT",
            DomainError::ValidationFailed(_) => "VALIDATION_FAILED",
            DomainError::DatabaseError(_) => "DATABASE_ERROR",
            DomainError::SerializationError(_) => "SERIALIZATION_ERROR",
            DomainError::CacheError(_) => "CACHE_ERROR",
        };
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}

/// Map a domain error to its status code and body.
pub fn domain_error(error: DomainError) -> ApiError {
    let status = match &error {
        DomainError::TranslationNotFound(_) | DomainError::TagNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::UniqueViolation(_) => StatusCode::CONFLICT,
        DomainError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::DatabaseError(_) | DomainError::SerializationError(_) | DomainError::CacheError(_) => {
            tracing::error!(error = %error, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::from(error)))
}

/// Deserialize a present field (including `null`) as `Some`, so that
/// `#[serde(default)]` leaves an absent field as `None`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request to create a translation.
#[derive(Debug, Deserialize)]
pub struct CreateTranslationRequest {
    pub key: String,
    pub locale: String,
    pub content: String,
    /// Tag names; created when missing.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<CreateTranslationRequest> for TranslationInput {
    fn from(req: CreateTranslationRequest) -> Self {
        Self {
            key: req.key,
            locale: req.locale,
            content: req.content,
            tags: req.tags,
        }
    }
}

/// Request to update a translation.
///
/// An absent `tags` field keeps the associations; `null` or `[]` clears them.
#[derive(Debug, Deserialize)]
pub struct UpdateTranslationRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub tags: Option<Option<Vec<String>>>,
}

impl From<UpdateTranslationRequest> for TranslationUpdate {
    fn from(req: UpdateTranslationRequest) -> Self {
        Self {
            key: req.key,
            locale: req.locale,
            content: req.content,
            tags: req.tags.map(Option::unwrap_or_default),
        }
    }
}

/// Query parameters for listing and searching translations.
#[derive(Debug, Default, Deserialize)]
pub struct TranslationQueryParams {
    #[serde(default)]
    pub locale: Option<String>,
    /// Substring of the translation key.
    #[serde(default)]
    pub key: Option<String>,
    /// Comma-separated tag slugs.
    #[serde(default)]
    pub tags: Option<String>,
    /// Full-text query over content (search only).
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Query parameters for the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub locale: Option<String>,
    /// Comma-separated tag names or slugs.
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleParam {
    #[serde(default)]
    pub locale: Option<String>,
}

/// Split a comma-separated list, dropping blank items.
pub fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Request to create a tag.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to update a tag.
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response with a tag.
#[derive(Debug, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
            description: t.description,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// Response with a translation and its tags.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub id: Uuid,
    pub key: String,
    pub locale: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Translation> for TranslationResponse {
    fn from(t: Translation) -> Self {
        Self {
            id: t.id,
            key: t.key,
            locale: t.locale,
            content: t.content,
            tags: t.tags.into_iter().map(TagResponse::from).collect(),
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// One page of translations.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl From<Page<Translation>> for PageResponse<TranslationResponse> {
    fn from(page: Page<Translation>) -> Self {
        let last_page = page.last_page();
        let page = page.map(TranslationResponse::from);
        Self {
            data: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            last_page,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalesResponse {
    pub locales: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_absent_and_null_tags() {
        let absent: UpdateTranslationRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(TranslationUpdate::from(absent).tags, None);

        let null: UpdateTranslationRequest = serde_json::from_str(r#"{"tags":null}"#).unwrap();
        assert_eq!(TranslationUpdate::from(null).tags, Some(vec![]));

        let empty: UpdateTranslationRequest = serde_json::from_str(r#"{"tags":[]}"#).unwrap();
        assert_eq!(TranslationUpdate::from(empty).tags, Some(vec![]));

        let some: UpdateTranslationRequest = serde_json::from_str(r#"{"tags":["web"]}"#).unwrap();
        assert_eq!(TranslationUpdate::from(some).tags, Some(vec!["web".to_string()]));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("web, mobile,,")), Some(vec!["web".to_string(), "mobile".to_string()]));
        assert_eq!(split_list(Some(" , ")), None);
        assert_eq!(split_list(None), None);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(domain_error(DomainError::UniqueViolation("x".into())).0, StatusCode::CONFLICT);
        assert_eq!(
            domain_error(DomainError::ValidationFailed("x".into())).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(domain_error(DomainError::TagNotFound(Uuid::nil())).0, StatusCode::NOT_FOUND);
        assert_eq!(
            domain_error(DomainError::DatabaseError("x".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
