use crate::batch::{parse_batch_queries, run_batch};
use crate::catalog::{CatalogApi, CatalogClient, CatalogError};
use crate::config::Settings;
use crate::export::{exporter_for, ExportConfig, ExportData, ExportFormat};
use crate::models::{ContentKind, SearchKind};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use constant_time_eq::constant_time_eq;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    /// Bearer token accepted by the batch export route.
    pub api_key: String,
}

pub async fn run_server(settings: Settings) -> Result<()> {
    let api_key = settings
        .api_key
        .clone()
        .context("REELFETCH_API_KEY must be set")?;
    let catalog: Arc<dyn CatalogApi> = Arc::new(CatalogClient::from_settings(&settings)?);
    info!("Catalog client targets {}", settings.tmdb_base_url);

    let app = build_router(AppState { catalog, api_key });

    info!("Listening on {}", settings.bind);
    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", get(search))
        .route("/api/movie/:id", get(movie))
        .route("/api/tv/:id", get(tv_show))
        .route("/api/export/movie/:id", get(export_movie))
        .route("/api/export/tv/:id", get(export_tv_show))
        .route("/api/export/batch", post(export_batch))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON error body `{"status":"error","message":...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Detail lookups report any catalog failure as not found.
    fn not_found(what: &str, id: i64, err: &CatalogError) -> Self {
        if err.is_not_found() {
            info!("{} {} not found", what, id);
        } else {
            warn!("Failed to fetch {} {}: {}", what, id, err);
        }
        Self::new(StatusCode::NOT_FOUND, format!("{what} {id} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "status": "error", "message": self.message })),
        )
            .into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn parse_kind(raw: Option<&str>, fallback: SearchKind) -> Result<SearchKind, ApiError> {
    match raw {
        None | Some("") => Ok(fallback),
        Some(s) => s.parse().map_err(|e: anyhow::Error| ApiError::bad_request(e.to_string())),
    }
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::bad_request("Query parameter 'q' is required"));
    }
    let kind = parse_kind(params.kind.as_deref(), SearchKind::default())?;
    let results = state.catalog.search(query, kind).await.map_err(|e| {
        error!("Search for '{}' failed: {}", query, e);
        ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
    })?;
    Ok(Json(results).into_response())
}

async fn movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let movie = state
        .catalog
        .get_movie(id)
        .await
        .map_err(|e| ApiError::not_found("Movie", id, &e))?;
    Ok(Json(movie).into_response())
}

#[derive(Debug, Deserialize)]
struct ShowParams {
    include_episodes: Option<bool>,
}

async fn tv_show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ShowParams>,
) -> Result<Response, ApiError> {
    let show = state
        .catalog
        .get_tv_show(id, params.include_episodes.unwrap_or(true))
        .await
        .map_err(|e| ApiError::not_found("TV show", id, &e))?;
    Ok(Json(show).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct ExportParams {
    format: Option<String>,
    include_cast: Option<bool>,
    include_episodes: Option<bool>,
    include_images: Option<bool>,
}

impl ExportParams {
    fn config(&self) -> Result<ExportConfig, ApiError> {
        let format = match self.format.as_deref() {
            None | Some("") => ExportFormat::default(),
            Some(s) => s
                .parse()
                .map_err(|e: anyhow::Error| ApiError::bad_request(e.to_string()))?,
        };
        let defaults = ExportConfig::with_format(format);
        Ok(ExportConfig {
            include_cast: self.include_cast.unwrap_or(defaults.include_cast),
            include_episodes: self.include_episodes.unwrap_or(defaults.include_episodes),
            include_images: self.include_images.unwrap_or(defaults.include_images),
            ..defaults
        })
    }
}

/// Encode one title and wrap it as an attachment download.
fn download(content: &ContentKind, config: &ExportConfig) -> Result<Response, ApiError> {
    let exporter = exporter_for(config.format);
    let body = exporter
        .export(ExportData::Single(content), config)
        .map_err(|e| {
            error!("Export of {} failed: {}", content.id(), e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    let filename = format!(
        "{}.{}",
        config.file_stem(content.display_title(), &today()),
        exporter.file_extension()
    );
    let disposition = HeaderValue::from_bytes(format!("attachment; filename=\"{filename}\"").as_bytes())
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!("Exported '{}' as {}", content.display_title(), filename);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(exporter.content_type()),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok((headers, body).into_response())
}

fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

async fn export_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let config = params.config()?;
    let movie = state
        .catalog
        .get_movie(id)
        .await
        .map_err(|e| ApiError::not_found("Movie", id, &e))?;
    download(&ContentKind::Movie(movie), &config)
}

async fn export_tv_show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let config = params.config()?;
    let show = state
        .catalog
        .get_tv_show(id, config.include_episodes)
        .await
        .map_err(|e| ApiError::not_found("TV show", id, &e))?;
    download(&ContentKind::Show(show), &config)
}

#[derive(Debug, Default, Deserialize)]
struct BatchParams {
    format: Option<String>,
    include_cast: Option<bool>,
    include_episodes: Option<bool>,
    include_images: Option<bool>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl BatchParams {
    fn export(&self) -> ExportParams {
        ExportParams {
            format: self.format.clone(),
            include_cast: self.include_cast,
            include_episodes: self.include_episodes,
            include_images: self.include_images,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

async fn export_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BatchParams>,
    body: String,
) -> Result<Response, ApiError> {
    let authorized = bearer_token(&headers)
        .map(|token| constant_time_eq(token.as_bytes(), state.api_key.as_bytes()))
        .unwrap_or(false);
    if !authorized {
        warn!("Rejecting batch export: missing or invalid bearer token");
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    let config = params.export().config()?;
    // Batch lists are titles of films unless a type says otherwise.
    let kind = parse_kind(params.kind.as_deref(), SearchKind::Movie)?;
    let queries = parse_batch_queries(&body);
    if queries.is_empty() {
        return Err(ApiError::bad_request("Batch body contains no queries"));
    }
    info!("Batch export of {} queries as {}", queries.len(), config.format);

    let report = run_batch(state.catalog.as_ref(), &queries, kind, config.include_episodes).await;

    let exporter = exporter_for(config.format);
    let date = today();
    let mut exported = Vec::new();
    let mut failed: Vec<serde_json::Value> = report
        .failed()
        .map(|(query, reason)| json!({ "query": query, "error": reason }))
        .collect();
    for content in report.fetched() {
        match exporter.export(ExportData::Single(&content), &config) {
            Ok(body) => exported.push(json!({
                "id": content.id(),
                "media_type": content.media_type(),
                "title": content.display_title(),
                "filename": format!(
                    "{}.{}",
                    config.file_stem(content.display_title(), &date),
                    exporter.file_extension()
                ),
                "content": body,
            })),
            Err(e) => failed.push(json!({ "query": content.display_title(), "error": e.to_string() })),
        }
    }
    let unmatched: Vec<&str> = report.unmatched().collect();

    Ok(Json(json!({
        "status": "success",
        "format": config.format,
        "content_type": exporter.content_type(),
        "exported": exported,
        "unmatched": unmatched,
        "failed": failed,
    }))
    .into_response())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
