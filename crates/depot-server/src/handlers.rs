//! HTTP request handlers.
//!
//! Each handler extracts (project, version, file, token) from the request,
//! parses the path segments into validated names, and delegates to the
//! artifact service. Name parsing happens before any filesystem access, so
//! crafted path segments fail with 400 at the door.

use crate::auth::bearer_token;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use depot_core::{FileName, ProjectName, VersionName};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Receipt returned for a successful upload.
#[derive(Serialize)]
pub struct PutFileResponse {
    pub project: ProjectName,
    pub version: VersionName,
    pub file: FileName,
    pub size: usize,
}

/// Liveness probe. Intentionally unauthenticated.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /v1/projects/{project}/versions`
pub async fn list_versions(
    State(state): State<AppState>,
    Path(project): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<String>>> {
    let project = ProjectName::new(project)?;
    let token = bearer_token(&headers);
    let versions = state.service.list_versions(&project, token).await?;
    Ok(Json(versions))
}

/// `POST /v1/projects/{project}/versions/{version}`
pub async fn create_version(
    State(state): State<AppState>,
    Path((project, version)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let project = ProjectName::new(project)?;
    let version = VersionName::new(version)?;
    let token = bearer_token(&headers);
    state
        .service
        .create_or_open_version(&project, &version, token)
        .await?;
    Ok(StatusCode::CREATED)
}

/// `GET /v1/projects/{project}/versions/{version}/files`
pub async fn list_files(
    State(state): State<AppState>,
    Path((project, version)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<String>>> {
    let project = ProjectName::new(project)?;
    let version = VersionName::new(version)?;
    let token = bearer_token(&headers);
    let files = state.service.list_files(&project, &version, token).await?;
    Ok(Json(files))
}

/// `GET /v1/projects/{project}/versions/{version}/files/{file}`
pub async fn get_file(
    State(state): State<AppState>,
    Path((project, version, file)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let project = ProjectName::new(project)?;
    let version = VersionName::new(version)?;
    let file = FileName::new(file)?;
    let token = bearer_token(&headers);

    let (stream, size) = state
        .service
        .get_file_stream(&project, &version, &file, token)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(format!("failed to build response: {e}")))
}

/// `PUT /v1/projects/{project}/versions/{version}/files/{file}`
///
/// The raw request body is the artifact content. The body is fully
/// buffered before the store's per-version lock is taken, so a client
/// disconnect aborts the request without touching the target file.
pub async fn put_file(
    State(state): State<AppState>,
    Path((project, version, file)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let project = ProjectName::new(project)?;
    let version = VersionName::new(version)?;
    let file = FileName::new(file)?;
    let token = bearer_token(&headers);
    let size = body.len();

    state
        .service
        .put_file(&project, &version, &file, token, body)
        .await?;

    tracing::info!(
        project = %project,
        version = %version,
        file = %file,
        size,
        "artifact uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(PutFileResponse {
            project,
            version,
            file,
            size,
        }),
    ))
}
