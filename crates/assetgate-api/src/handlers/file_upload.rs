//! Raw file endpoints: files are stored as sent, without image processing.

use std::sync::Arc;

use assetgate_core::models::{ResponseKey, StoredFile};
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::multipart::{read_single_file, read_upload_form};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PrefixQuery {
    /// Storage folder, used as given
    pub prefix: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferUrlsRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredFileResponse {
    pub data: StoredFile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredFilesResponse {
    pub data: Vec<StoredFile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseKeysResponse {
    pub data: Vec<ResponseKey>,
}

/// Store one multipart `file` under `<timestamp>-<name>`.
#[utoipa::path(
    post,
    path = "/file",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = StoredFileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let source = read_single_file(multipart, "file", &state.validator).await?;
    let stored = state.files.upload(source).await?;

    tracing::info!(key = %stored.filename, "File stored");

    Ok((StatusCode::CREATED, Json(StoredFileResponse { data: stored })))
}

/// Store every multipart `files` part under `prefix`.
#[utoipa::path(
    post,
    path = "/multiple-file",
    tag = "files",
    params(PrefixQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files stored", body = ResponseKeysResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(prefix = ?query.prefix, operation = "upload_multiple_files")
)]
pub async fn upload_multiple_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrefixQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(multipart, "files", &state.validator).await?;
    let prefix = query.prefix.or(form.prefix);

    let keys = state
        .files
        .upload_multiple(form.files, prefix.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(ResponseKeysResponse { data: keys })))
}

/// Download each URL and store it unchanged.
#[utoipa::path(
    post,
    path = "/transfer-file-url",
    tag = "files",
    request_body = TransferUrlsRequest,
    responses(
        (status = 201, description = "Files transferred", body = StoredFilesResponse),
        (status = 400, description = "Invalid URL or download failure", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(url_count = request.urls.len()))]
pub async fn transfer_file_urls(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TransferUrlsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.validator.validate_urls(&request.urls)?;

    let stored = state.files.transfer_urls(&request.urls).await?;

    Ok((StatusCode::CREATED, Json(StoredFilesResponse { data: stored })))
}
