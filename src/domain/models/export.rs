//! Export shapes for bulk translation delivery.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::translation::Translation;

/// Translation key -> content for one slice of the store.
pub type LocaleMessages = BTreeMap<String, String>;

/// Result of an export.
///
/// A filtered export (by locale and/or tags) is a flat key/content map. The
/// unfiltered export is grouped by every known locale. Serialised untagged,
/// so clients see either `{ "app.name": "..." }` or
/// `{ "en": { "app.name": "..." } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationExport {
    ByLocale(BTreeMap<String, LocaleMessages>),
    Flat(LocaleMessages),
}

impl TranslationExport {
    /// Flatten translations into a key/content map.
    ///
    /// Rows are applied oldest update first, so when two rows share a key
    /// (possible once several locales are mixed) the latest value wins.
    pub fn flatten(mut translations: Vec<Translation>) -> LocaleMessages {
        translations.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        translations
            .into_iter()
            .map(|t| (t.key, t.content))
            .collect()
    }

    pub fn as_flat(&self) -> Option<&LocaleMessages> {
        match self {
            Self::Flat(messages) => Some(messages),
            Self::ByLocale(_) => None,
        }
    }

    pub fn as_by_locale(&self) -> Option<&BTreeMap<String, LocaleMessages>> {
        match self {
            Self::ByLocale(groups) => Some(groups),
            Self::Flat(_) => None,
        }
    }
}
