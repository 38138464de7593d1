//! Filtering and pagination types for translation listing and search.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of rows per page.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Conjunctive filters over live translations. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationFilter {
    /// Exact locale match.
    #[serde(default)]
    pub locale: Option<String>,
    /// Substring match on the translation key.
    #[serde(default)]
    pub key_contains: Option<String>,
    /// Tag slugs; a translation matches when it carries at least one of them.
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
}

impl TranslationFilter {
    pub fn locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Default::default()
        }
    }

    pub fn with_key_contains(mut self, fragment: impl Into<String>) -> Self {
        self.key_contains = Some(fragment.into());
        self
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

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Number of the last non-empty page (1 when there are no rows).
    pub fn last_page(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.per_page.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Criteria for [`search`](crate::domain::ports::TranslationRepository::search):
/// the list filters plus an optional full-text predicate over content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub filter: TranslationFilter,
    /// Full-text query over content. Blank input applies no predicate.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub page: PageRequest,
}

impl SearchCriteria {
    pub fn content(query: impl Into<String>) -> Self {
        Self {
            content: Some(query.into()),
            ..Default::default()
        }
    }

    /// The content query if it holds anything besides whitespace.
    pub fn content_query(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
