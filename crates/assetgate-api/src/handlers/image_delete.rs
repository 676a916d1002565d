use std::sync::Arc;

use assetgate_core::AppError;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteImageRequest {
    /// Storage key; a leading `/` is ignored
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageDeletedResponse {
    pub message: String,
    pub key: String,
}

/// Delete one stored object by key
#[utoipa::path(
    delete,
    path = "/image",
    tag = "images",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Image deleted", body = ImageDeletedResponse),
        (status = 400, description = "Missing or invalid key", body = ErrorResponse),
        (status = 404, description = "No object under key", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "delete_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteImageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = request
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing key".to_string()))?;
    let key = key.strip_prefix('/').unwrap_or(&key).to_string();

    state.storage.delete(&key).await?;

    tracing::info!(key = %key, "Image deleted");

    Ok((
        StatusCode::OK,
        Json(ImageDeletedResponse {
            message: "Image deleted".to_string(),
            key,
        }),
    ))
}
