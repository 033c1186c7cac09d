//! # API REST
//!
//! REST API implementation for the filestore service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (multipart uploads, JSON serialization, CORS, API key, body limit)
//!
//! Uses `api-shared` for request/response bodies and `filestore-core` for the storage
//! coordinator.

#![warn(rust_2018_idioms)]

pub mod config;
mod error;

pub use config::ServerConfig;
pub use error::ApiError;

use api_shared::{
    validate_api_key, ErrorRes, FileMetadataRes, HealthRes, HealthService, ListFilesQuery,
    ListFilesRes, UpdateFileReq, API_KEY_HEADER,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use filestore_core::{
    open_files_service, resolve_media_type, CoreResult, FileNameUpdate, FilesService,
    ListRequest, NonEmptyText, UploadedFile,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Name of the multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    files: Arc<FilesService>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(files: FilesService) -> Self {
        Self {
            files: Arc::new(files),
            api_key: None,
        }
    }

    /// Require `x-api-key: <key>` on every `/files` route.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Arc::from(key.into()));
        self
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        upload_file,
        list_files,
        download_file,
        get_file_metadata,
        update_file,
        delete_file,
    ),
    components(schemas(
        HealthRes,
        FileMetadataRes,
        ListFilesRes,
        UpdateFileReq,
        ErrorRes,
        UploadForm,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over `state`.
///
/// `/health` and the Swagger UI stay open; the `/files` routes sit behind the API key check
/// when one is configured. Request bodies are capped at `max_upload_bytes`.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let files = Router::new()
        .route("/files", get(list_files).post(upload_file))
        .route(
            "/files/:id",
            get(download_file).patch(update_file).delete(delete_file),
        )
        .route("/files/:id/metadata", get(get_file_metadata))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(files)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Opens the files service described by `cfg` and builds the router around it.
pub async fn build_app(cfg: &ServerConfig) -> CoreResult<Router> {
    let files = open_files_service(&cfg.core).await?;
    let mut state = AppState::new(files);
    if let Some(key) = &cfg.api_key {
        state = state.with_api_key(key.clone());
    } else {
        tracing::warn!("no API key configured; /files routes are open");
    }
    Ok(router(state, cfg.max_upload_bytes))
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::warn!("cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        validate_api_key(provided, expected)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    }
    Ok(next.run(request).await)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks; never requires the API key.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = FileMetadataRes),
        (status = 400, description = "Missing file field", body = ErrorRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes),
        (status = 413, description = "Upload too large", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Store an uploaded file
///
/// Reads the multipart field `file`. The part's `Content-Type` is recorded when it parses;
/// otherwise the content is sniffed, falling back to `application/octet-stream`.
///
/// # Errors
/// Returns `400 Bad Request` if the field is missing or has no filename, and
/// `413 Payload Too Large` if the body exceeds the configured limit.
#[axum::debug_handler]
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileMetadataRes>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("uploaded file has no filename".into()))?;
        let declared = field.content_type().map(str::to_owned);
        let content = field.bytes().await?.to_vec();

        let media = resolve_media_type(declared.as_deref(), &content);
        let view = state
            .files
            .upload(UploadedFile::new(original_name, content, media.into_inner()))
            .await?;
        return Ok((StatusCode::CREATED, Json(view.into())));
    }

    Err(ApiError::BadRequest(format!(
        "multipart field '{}' is required",
        UPLOAD_FIELD
    )))
}

#[utoipa::path(
    get,
    path = "/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "One page of files in upload order", body = ListFilesRes),
        (status = 401, description = "Missing or invalid API key", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List stored files, one page at a time
#[axum::debug_handler]
async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ListFilesRes>, ApiError> {
    let (page, page_size) = query.resolve();
    let files = state.files.list(ListRequest { page_size, page }).await?;

    Ok(Json(ListFilesRes {
        files: files.into_iter().map(FileMetadataRes::from).collect(),
        page,
        page_size,
    }))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    params(("id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Raw file content with its recorded media type"),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Download a file's bytes
#[axum::debug_handler]
async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.files.download(&id).await?;
    let length = file.content.len().to_string();

    Ok((
        [
            (header::CONTENT_TYPE, file.mimetype),
            (header::CONTENT_LENGTH, length),
        ],
        file.content,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/files/{id}/metadata",
    params(("id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File metadata", body = FileMetadataRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_file_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileMetadataRes>, ApiError> {
    let view = state.files.get_metadata(&id).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    patch,
    path = "/files/{id}",
    params(("id" = String, Path, description = "File identifier")),
    request_body = UpdateFileReq,
    responses(
        (status = 200, description = "File renamed", body = FileMetadataRes),
        (status = 400, description = "Empty name", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Rename a file
///
/// Only the display name changes; the extension, media type and stored bytes are untouched.
#[axum::debug_handler]
async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFileReq>,
) -> Result<Json<FileMetadataRes>, ApiError> {
    let name = NonEmptyText::new(&req.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let view = state
        .files
        .update_metadata(FileNameUpdate {
            id,
            name: name.into_inner(),
        })
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(("id" = String, Path, description = "File identifier")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.files.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
