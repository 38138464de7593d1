//! Lexicon HTTP server.
//!
//! JSON CRUD endpoints for translations and tags, the locale listing, the
//! bulk export and export-cache invalidation.

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::dto::{
    api_error, domain_error, not_found, split_list, ApiResult, CreateTagRequest,
    CreateTranslationRequest, ExportParams, LocaleParam, LocalesResponse, PageResponse,
    TagResponse, TranslationQueryParams, TranslationResponse, UpdateTagRequest,
    UpdateTranslationRequest,
};
use crate::domain::errors::DomainError;
use crate::domain::models::{
    NewTag, PageRequest, PaginationConfig, SearchCriteria, ServerConfig, TagPatch,
    TranslationExport, TranslationFilter,
};
use crate::domain::ports::{TagRepository, TranslationRepository};
use crate::services::{TagService, TranslationService};

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub pagination: PaginationConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for HttpConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            enable_cors: server.enable_cors,
            pagination: PaginationConfig::default(),
        }
    }
}

impl HttpConfig {
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Shared state for the HTTP handlers.
struct AppState<T: TranslationRepository, G: TagRepository> {
    translations: TranslationService<T, G>,
    tags: TagService<G>,
    pagination: PaginationConfig,
}

type SharedState<T, G> = State<Arc<AppState<T, G>>>;

pub struct LexiconHttpServer<T: TranslationRepository + 'static, G: TagRepository + 'static> {
    config: HttpConfig,
    translations: TranslationService<T, G>,
    tags: TagService<G>,
}

impl<T: TranslationRepository + 'static, G: TagRepository + 'static> LexiconHttpServer<T, G> {
    pub fn new(translations: TranslationService<T, G>, tags: TagService<G>, config: HttpConfig) -> Self {
        Self {
            config,
            translations,
            tags,
        }
    }

    /// Build the router.
    pub fn router(self) -> Router {
        let enable_cors = self.config.enable_cors;
        let state = Arc::new(AppState {
            translations: self.translations,
            tags: self.tags,
            pagination: self.config.pagination,
        });

        let app = Router::new()
            .route(
                "/api/v1/translations",
                get(list_translations::<T, G>).post(create_translation::<T, G>),
            )
            .route("/api/v1/translations/search", get(search_translations::<T, G>))
            .route("/api/v1/translations/locales", get(available_locales::<T, G>))
            .route("/api/v1/translations/export", get(export_translations::<T, G>))
            .route(
                "/api/v1/translations/{id}",
                get(get_translation::<T, G>)
                    .put(update_translation::<T, G>)
                    .delete(delete_translation::<T, G>),
            )
            .route("/api/v1/tags", get(list_tags::<T, G>).post(create_tag::<T, G>))
            .route(
                "/api/v1/tags/{id}",
                get(get_tag::<T, G>).put(update_tag::<T, G>).delete(delete_tag::<T, G>),
            )
            .route("/api/v1/cache/export", delete(invalidate_export_cache::<T, G>))
            .route("/health", get(health_check))
            .with_state(state);

        if enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.config.host, self.config.port))
    }

    /// Start the server.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = self.router();

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!(%addr, "lexicon HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;
        Ok(())
    }
}

async fn health_check() -> &'static str {
    "OK"
}

fn page_request<T: TranslationRepository, G: TagRepository>(
    state: &AppState<T, G>,
    params: &TranslationQueryParams,
) -> PageRequest {
    PageRequest::new(params.page.unwrap_or(1), state.pagination.resolve(params.per_page))
}

fn filter_from(params: &TranslationQueryParams) -> TranslationFilter {
    TranslationFilter {
        locale: params.locale.clone(),
        key_contains: params.key.clone().filter(|k| !k.is_empty()),
        tags: split_list(params.tags.as_deref()).map(|tags| tags.into_iter().collect()),
    }
}

async fn list_translations<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Query(params): Query<TranslationQueryParams>,
) -> ApiResult<Json<PageResponse<TranslationResponse>>> {
    let page = page_request(&state, &params);
    let result = state
        .translations
        .list_translations(&filter_from(&params), page)
        .await
        .map_err(domain_error)?;
    Ok(Json(result.into()))
}

async fn search_translations<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Query(params): Query<TranslationQueryParams>,
) -> ApiResult<Json<PageResponse<TranslationResponse>>> {
    let criteria = SearchCriteria {
        filter: filter_from(&params),
        content: params.q.clone(),
        page: page_request(&state, &params),
    };
    let result = state
        .translations
        .search_translations(&criteria)
        .await
        .map_err(domain_error)?;
    Ok(Json(result.into()))
}

async fn create_translation<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Json(req): Json<CreateTranslationRequest>,
) -> ApiResult<(StatusCode, Json<TranslationResponse>)> {
    let created = state
        .translations
        .create_translation(req.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_translation<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TranslationResponse>> {
    match state.translations.find_translation(id).await.map_err(domain_error)? {
        Some(translation) => Ok(Json(translation.into())),
        None => Err(not_found(DomainError::TranslationNotFound(id))),
    }
}

async fn update_translation<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTranslationRequest>,
) -> ApiResult<Json<TranslationResponse>> {
    match state
        .translations
        .update_translation(id, req.into())
        .await
        .map_err(domain_error)?
    {
        Some(translation) => Ok(Json(translation.into())),
        None => Err(not_found(DomainError::TranslationNotFound(id))),
    }
}

async fn delete_translation<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.translations.delete_translation(id).await.map_err(domain_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(DomainError::TranslationNotFound(id)))
    }
}

async fn available_locales<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
) -> ApiResult<Json<LocalesResponse>> {
    let locales = state.translations.available_locales().await.map_err(domain_error)?;
    Ok(Json(LocalesResponse { locales }))
}

async fn export_translations<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Json<TranslationExport>> {
    let tags = split_list(params.tags.as_deref());
    let locale = params.locale.as_deref().filter(|l| !l.is_empty());
    let export = state
        .translations
        .export_translations(locale, tags.as_deref())
        .await
        .map_err(domain_error)?;
    Ok(Json(export))
}

async fn invalidate_export_cache<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Query(params): Query<LocaleParam>,
) -> StatusCode {
    state
        .translations
        .invalidate_export_cache(params.locale.as_deref().filter(|l| !l.is_empty()))
        .await;
    StatusCode::NO_CONTENT
}

async fn list_tags<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
) -> ApiResult<Json<Vec<TagResponse>>> {
    let tags = state.tags.list_tags().await.map_err(domain_error)?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

async fn create_tag<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<TagResponse>)> {
    let tag = state
        .tags
        .create_tag(NewTag {
            name: req.name,
            slug: req.slug,
            description: req.description,
        })
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn get_tag<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TagResponse>> {
    match state.tags.find_tag(id).await.map_err(domain_error)? {
        Some(tag) => Ok(Json(tag.into())),
        None => Err(not_found(DomainError::TagNotFound(id))),
    }
}

async fn update_tag<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> ApiResult<Json<TagResponse>> {
    let patch = TagPatch {
        name: req.name,
        slug: req.slug,
        description: req.description,
    };
    match state.tags.update_tag(id, patch).await.map_err(domain_error)? {
        Some(tag) => Ok(Json(tag.into())),
        None => Err(not_found(DomainError::TagNotFound(id))),
    }
}

async fn delete_tag<T: TranslationRepository + 'static, G: TagRepository + 'static>(
    State(state): SharedState<T, G>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.tags.delete_tag(id).await.map_err(domain_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(StatusCode::NOT_FOUND, "NOT_FOUND", format!("Tag {id} not found")))
    }
}
