//! Tag domain model.
//!
//! Tags group translations (e.g. `mobile`, `web`, `checkout`). Every tag
//! carries a slug: the normalized, URL-safe projection of its name, unique
//! among live tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag attached to zero or more translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// Build a fresh tag from creation data, deriving the slug when absent.
    pub fn new(data: NewTag) -> Self {
        let now = Utc::now();
        let slug = data
            .slug
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| slugify(&data.name), |s| slugify(&s));
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            slug,
            description: data.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Merge a patch over this tag, field by field.
    ///
    /// A new name without an explicit slug re-derives the slug.
    pub fn apply(&mut self, patch: TagPatch) {
        if let Some(name) = patch.name {
            if patch.slug.is_none() {
                self.slug = slugify(&name);
            }
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slugify(&slug);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data needed to create a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a tag. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Derive a slug from a display name.
///
/// Lowercases ASCII letters, keeps ASCII alphanumerics and collapses every
/// other run of characters into a single `-`. Leading and trailing separators
/// are dropped, so `"  Mobile App!"` becomes `"mobile-app"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Mobile"), "mobile");
        assert_eq!(slugify("Mobile App"), "mobile-app");
        assert_eq!(slugify("  Mobile   App!! "), "mobile-app");
        assert_eq!(slugify("check_out/v2"), "check-out-v2");
    }

    #[test]
    fn test_slugify_case_variants_collide() {
        assert_eq!(slugify("Mobile"), slugify("mobile"));
        assert_eq!(slugify("MOBILE"), slugify("mobile"));
    }

    #[test]
    fn test_slugify_no_alphanumerics() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_new_tag_derives_slug() {
        let tag = Tag::new(NewTag::named("Landing Page"));
        assert_eq!(tag.name, "Landing Page");
        assert_eq!(tag.slug, "landing-page");
        assert!(!tag.is_deleted());
    }

    #[test]
    fn test_new_tag_normalizes_explicit_slug() {
        let tag = Tag::new(NewTag {
            name: "Web".to_string(),
            slug: Some("Web Front".to_string()),
            description: None,
        });
        assert_eq!(tag.slug, "web-front");
    }

    #[test]
    fn test_apply_rename_rederives_slug() {
        let mut tag = Tag::new(NewTag::named("Mobile"));
        tag.apply(TagPatch {
            name: Some("Mobile Apps".to_string()),
            ..Default::default()
        });
        assert_eq!(tag.slug, "mobile-apps");
    }

    #[test]
    fn test_apply_keeps_unsupplied_fields() {
        let mut tag = Tag::new(NewTag {
            name: "Mobile".to_string(),
            slug: None,
            description: Some("Phone UI".to_string()),
        });
        tag.apply(TagPatch::default());
        assert_eq!(tag.name, "Mobile");
        assert_eq!(tag.slug, "mobile");
        assert_eq!(tag.description.as_deref(), Some("Phone UI"));
    }

    proptest! {
        #[test]
        fn prop_slug_is_url_safe(name in ".{0,64}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slugify_is_idempotent(name in ".{0,64}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
