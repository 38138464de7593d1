//! Service-level scenarios over SQLite and the shared moka cache.

mod common;

use lexicon::domain::errors::DomainError;
use lexicon::domain::models::{PageRequest, TranslationFilter, TranslationUpdate};
use lexicon::domain::ports::TranslationRepository;

use common::{input, raw_repository, setup_services, tagged};

#[tokio::test]
async fn test_created_translation_found_by_key_and_locale() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("app.name", "en", "Application")).await.unwrap();

    let found = service.find_by_key("app.name", "en").await.unwrap().unwrap();
    assert_eq!(found.content, "Application");
    assert!(service.find_by_key("app.name", "fr").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_key_and_locale_rejected_by_store() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("app.name", "en", "Application")).await.unwrap();
    let result = service.create_translation(input("app.name", "en", "Other")).await;

    assert!(matches!(result, Err(DomainError::UniqueViolation(_))));
    service.create_translation(input("app.name", "de", "Anwendung")).await.unwrap();
}

#[tokio::test]
async fn test_update_replaces_cached_value() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    let created = service.create_translation(input("cart.title", "en", "Cart")).await.unwrap();
    // Warm every cached read path.
    service.find_translation(created.id).await.unwrap();
    service.find_by_key("cart.title", "en").await.unwrap();

    let update = TranslationUpdate {
        content: Some("Basket".to_string()),
        ..Default::default()
    };
    service.update_translation(created.id, update).await.unwrap().unwrap();

    assert_eq!(service.find_translation(created.id).await.unwrap().unwrap().content, "Basket");
    assert_eq!(service.find_by_key("cart.title", "en").await.unwrap().unwrap().content, "Basket");
}

#[tokio::test]
async fn test_soft_deleted_translation_recoverable_from_store() {
    let (pool, services) = setup_services().await;
    let service = &services.translations;

    let created = service.create_translation(input("legacy.banner", "en", "Old")).await.unwrap();
    service.find_translation(created.id).await.unwrap();

    assert!(service.delete_translation(created.id).await.unwrap());

    assert!(service.find_translation(created.id).await.unwrap().is_none());
    let page = service
        .list_translations(&TranslationFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);

    let trashed = raw_repository(&pool).find_with_trashed(created.id).await.unwrap().unwrap();
    assert!(trashed.is_deleted());
    assert_eq!(trashed.content, "Old");
}

#[tokio::test]
async fn test_tag_names_resolve_to_one_tag_per_slug() {
    let (_pool, services) = setup_services().await;

    services.translations.create_translation(tagged("a", "en", "A", &["Mobile"])).await.unwrap();
    services.translations.create_translation(tagged("b", "en", "B", &["mobile"])).await.unwrap();

    let tags = services.tags.list_tags().await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].slug, "mobile");
}

#[tokio::test]
async fn test_locale_export_matches_live_rows() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("app.name", "en", "Application")).await.unwrap();
    let gone = service.create_translation(input("app.old", "en", "Old")).await.unwrap();
    service.create_translation(input("app.name", "fr", "Application FR")).await.unwrap();
    service.delete_translation(gone.id).await.unwrap();

    let export = service.export_translations(Some("en"), None).await.unwrap();
    let messages = export.as_flat().unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages["app.name"], "Application");
}

#[tokio::test]
async fn test_tag_export_includes_tagged_translation() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service
        .create_translation(tagged("app.name", "en", "Application", &["mobile"]))
        .await
        .unwrap();
    service.create_translation(input("app.footer", "en", "Footer")).await.unwrap();

    let tags = vec!["mobile".to_string()];
    let export = service.export_translations(None, Some(&tags)).await.unwrap();
    let messages = export.as_flat().unwrap();

    assert_eq!(messages.get("app.name").map(String::as_str), Some("Application"));
    assert!(!messages.contains_key("app.footer"));
}

#[tokio::test]
async fn test_export_refreshed_after_write() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("a", "en", "A")).await.unwrap();
    assert_eq!(service.export_translations(Some("en"), None).await.unwrap().as_flat().unwrap().len(), 1);
    let grouped = service.export_translations(None, None).await.unwrap();
    assert_eq!(grouped.as_by_locale().unwrap().len(), 1);

    service.create_translation(input("b", "en", "B")).await.unwrap();
    service.create_translation(input("a", "fr", "A fr")).await.unwrap();

    let flat = service.export_translations(Some("en"), None).await.unwrap();
    assert_eq!(flat.as_flat().unwrap().len(), 2);
    let grouped = service.export_translations(None, None).await.unwrap();
    assert_eq!(grouped.as_by_locale().unwrap().keys().collect::<Vec<_>>(), vec!["en", "fr"]);
}

#[tokio::test]
async fn test_bulk_import_rolls_back_on_conflict() {
    let (pool, services) = setup_services().await;

    let mut rows: Vec<_> = (0..10).map(|i| input(&format!("key.{i}"), "en", "x")).collect();
    rows[5] = input("key.0", "en", "duplicate");

    let result = services.translations.bulk_import(rows).await;
    assert!(matches!(result, Err(DomainError::UniqueViolation(_))));

    let page = raw_repository(&pool)
        .list(&TranslationFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_bulk_import_visible_through_cache() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    assert!(service.available_locales().await.unwrap().is_empty());

    let rows = vec![input("a", "en", "A"), input("a", "de", "A de")];
    assert_eq!(service.bulk_import(rows).await.unwrap(), 2);

    assert_eq!(service.available_locales().await.unwrap(), vec!["de", "en"]);
}

#[tokio::test]
async fn test_available_locales_idempotent() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("a", "fr", "A")).await.unwrap();
    service.create_translation(input("a", "en", "A")).await.unwrap();

    let first = service.available_locales().await.unwrap();
    let second = service.available_locales().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, vec!["en", "fr"]);
}

#[tokio::test]
async fn test_invalidate_export_cache_drops_entries() {
    let (_pool, services) = setup_services().await;
    let service = &services.translations;

    service.create_translation(input("a", "en", "A")).await.unwrap();
    service.export_translations(Some("en"), None).await.unwrap();
    service.export_translations(None, None).await.unwrap();
    assert!(services.cache.entry_count().await > 0);

    service.invalidate_export_cache(None).await;
    assert_eq!(services.cache.entry_count().await, 0);
}
