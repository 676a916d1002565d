//! Category-driven image uploads.

use std::sync::Arc;

use assetgate_core::models::UploadResponse;
use assetgate_processing::UploadOptions;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::file_upload::PrefixQuery;
use crate::state::AppState;
use crate::utils::multipart::read_upload_form;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferImagesRequest {
    pub urls: Vec<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImagesUploadedResponse {
    pub message: String,
    pub files: UploadResponse,
}

/// Upload images and derive the variants configured for `category`
///
/// Files come from the multipart `files` parts. The storage folder is taken from the
/// `prefix` query parameter (or a `prefix` form field) and must be on the allow-list;
/// anything else falls back to the default folder.
///
/// # Errors
/// - `AppError::InvalidInput` - no files, too many files, empty file
/// - `AppError::PayloadTooLarge` - file exceeds size limit
/// - `AppError::ImageProcessing` - undecodable image or degenerate crop
/// - `AppError::Storage` - blob store failure
#[utoipa::path(
    post,
    path = "/images/{category}",
    tag = "images",
    params(
        ("category" = String, Path, description = "Category name, e.g. avatar or school-thumbnail"),
        PrefixQuery
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Images uploaded", body = ImagesUploadedResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(category = %category, prefix = ?query.prefix, operation = "upload_images")
)]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<PrefixQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(multipart, "files", &state.validator).await?;
    let prefix = query.prefix.or(form.prefix);

    let files = state
        .orchestrator
        .upload(
            form.files,
            Some(category.as_str()),
            prefix.as_deref(),
            UploadOptions::validated(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ImagesUploadedResponse {
            message: "Images uploaded".to_string(),
            files,
        }),
    ))
}

/// Download images by URL, then process them exactly like uploaded files.
#[utoipa::path(
    post,
    path = "/images/{category}/transfer-url",
    tag = "images",
    params(("category" = String, Path, description = "Category name")),
    request_body = TransferImagesRequest,
    responses(
        (status = 201, description = "Images transferred", body = ImagesUploadedResponse),
        (status = 400, description = "Invalid URL, download or decode failure", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(category = %category, url_count = request.urls.len(), operation = "transfer_image_urls")
)]
pub async fn transfer_image_urls(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    ValidatedJson(request): ValidatedJson<TransferImagesRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.validator.validate_urls(&request.urls)?;

    let files = state
        .files
        .transfer_image_urls(&request.urls, Some(category.as_str()), request.prefix.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ImagesUploadedResponse {
            message: "Images uploaded".to_string(),
            files,
        }),
    ))
}
