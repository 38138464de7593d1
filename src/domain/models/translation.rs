//! Translation domain model.
//!
//! A translation is one piece of text for one `(key, locale)` pair, e.g.
//! `app.name` in `en`. Translations are soft-deleted: a set `deleted_at`
//! hides the row from every live query while keeping it in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::Tag;

/// A stored translation with its tags eagerly attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: Uuid,
    pub key: String,
    pub locale: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Translation {
    /// Build a fresh, untagged translation.
    pub fn new(key: impl Into<String>, locale: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            locale: locale.into(),
            content: content.into(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Merge the scalar fields of a patch over this translation.
    ///
    /// Tag associations are not touched here; they live in the join table.
    pub fn apply(&mut self, patch: &TranslationPatch) {
        if let Some(key) = &patch.key {
            self.key.clone_from(key);
        }
        if let Some(locale) = &patch.locale {
            self.locale.clone_from(locale);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        self.updated_at = Utc::now();
    }

    /// Slugs of the attached tags, in attachment order.
    pub fn tag_slugs(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.slug.clone()).collect()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Repository-level creation data. Tags are referenced by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTranslation {
    pub key: String,
    pub locale: String,
    pub content: String,
    /// When supplied, becomes the complete association set.
    #[serde(default)]
    pub tag_ids: Option<Vec<Uuid>>,
}

impl NewTranslation {
    pub fn new(key: impl Into<String>, locale: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locale: locale.into(),
            content: content.into(),
            tag_ids: None,
        }
    }

    pub fn with_tag_ids(mut self, tag_ids: Vec<Uuid>) -> Self {
        self.tag_ids = Some(tag_ids);
        self
    }
}

/// Repository-level partial update.
///
/// `None` means "not supplied, keep the stored value". For `tag_ids`,
/// `Some(vec![])` clears every association.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationPatch {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<Uuid>>,
}

impl TranslationPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Service-level creation data. Tags are given by name and resolved
/// (found or created) before the translation is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationInput {
    pub key: String,
    pub locale: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TranslationInput {
    pub fn new(key: impl Into<String>, locale: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locale: locale.into(),
            content: content.into(),
            tags: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Service-level partial update.
///
/// Tag resolution only happens when `tags` is `Some`; `Some(vec![])` clears
/// the associations and `None` leaves them untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationUpdate {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut translation = Translation::new("app.name", "en", "Application");
        let before = translation.updated_at;

        translation.apply(&TranslationPatch::content("App"));

        assert_eq!(translation.key, "app.name");
        assert_eq!(translation.locale, "en");
        assert_eq!(translation.content, "App");
        assert!(translation.updated_at >= before);
    }

    #[test]
    fn test_apply_empty_patch_keeps_values() {
        let mut translation = Translation::new("app.name", "en", "Application");
        translation.apply(&TranslationPatch::default());
        assert_eq!(translation.content, "Application");
    }

    #[test]
    fn test_input_with_tags() {
        let input = TranslationInput::new("k", "en", "v").with_tags(["mobile", "web"]);
        assert_eq!(input.tags, Some(vec!["mobile".to_string(), "web".to_string()]));
    }
}
