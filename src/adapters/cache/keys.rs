//! Cache key derivation.
//!
//! Every cached value lives under a dotted key derived from the entity or
//! query it represents. Writers use the same functions to compute the set of
//! keys an entity can appear under, so reads and invalidation never drift.

use uuid::Uuid;

use crate::domain::models::{Tag, Translation};

pub const AVAILABLE_LOCALES: &str = "translations.locales";
pub const ALL_TAGS: &str = "tags.all";
pub const EXPORT_ALL: &str = "export";

pub fn translation(id: Uuid) -> String {
    format!("translation.{id}")
}

pub fn translation_by_key(key: &str, locale: &str) -> String {
    format!("translation.{key}.{locale}")
}

pub fn translations_by_locale(locale: &str) -> String {
    format!("translations.locale.{locale}")
}

/// `translations.tags.<t1>,<t2>[.<locale>]` with the tags sorted and deduplicated,
/// so the same tag set always maps to the same key.
pub fn translations_by_tags<S: AsRef<str>>(tags: &[S], locale: Option<&str>) -> String {
    let mut key = format!("translations.tags.{}", normalize(tags).join(","));
    if let Some(locale) = locale {
        key.push('.');
        key.push_str(locale);
    }
    key
}

pub fn tag(id: Uuid) -> String {
    format!("tag.{id}")
}

pub fn tag_by_slug(slug: &str) -> String {
    format!("tag.slug.{slug}")
}

/// `export[.locale.<l>][.tags.<t1>.<t2>]`. An empty tag slice adds no tag part.
pub fn export<S: AsRef<str>>(locale: Option<&str>, tags: &[S]) -> String {
    let mut key = String::from(EXPORT_ALL);
    if let Some(locale) = locale {
        key.push_str(".locale.");
        key.push_str(locale);
    }
    if !tags.is_empty() {
        key.push_str(".tags.");
        key.push_str(&normalize(tags).join("."));
    }
    key
}

/// Every entity-level key a translation can be cached under.
///
/// Covers the translation itself, its locale aggregates and, per attached
/// slug, the single-tag aggregates. The joined key for the full slug set is
/// added when there is more than one tag. Other multi-tag combinations are
/// left to expire.
pub fn translation_keys(translation: &Translation) -> Vec<String> {
    let locale = translation.locale.as_str();
    let slugs = translation.tag_slugs();

    let mut keys = vec![
        self::translation(translation.id),
        translation_by_key(&translation.key, locale),
        translations_by_locale(locale),
        AVAILABLE_LOCALES.to_string(),
    ];

    for slug in &slugs {
        keys.push(translations_by_tags(&[slug], None));
        keys.push(translations_by_tags(&[slug], Some(locale)));
    }
    if slugs.len() > 1 {
        keys.push(translations_by_tags(&slugs, None));
        keys.push(translations_by_tags(&slugs, Some(locale)));
    }

    keys
}

/// Every key a tag can be cached under.
pub fn tag_keys(tag: &Tag) -> Vec<String> {
    vec![self::tag(tag.id), tag_by_slug(&tag.slug), ALL_TAGS.to_string()]
}

/// Export keys a translation can contribute to.
pub fn export_keys(translation: &Translation) -> Vec<String> {
    let locale = Some(translation.locale.as_str());
    let slugs = translation.tag_slugs();

    let mut keys = vec![
        EXPORT_ALL.to_string(),
        export::<&str>(locale, &[]),
    ];

    for slug in &slugs {
        keys.push(export(None, &[slug]));
        keys.push(export(locale, &[slug]));
    }
    if slugs.len() > 1 {
        keys.push(export(None, &slugs));
        keys.push(export(locale, &slugs));
    }

    keys
}

fn normalize<S: AsRef<str>>(tags: &[S]) -> Vec<&str> {
    let mut tags: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
    tags.sort_unstable();
    tags.dedup();
    tags
}
