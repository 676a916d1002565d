//! Multipart extraction for upload handlers

use assetgate_core::AppError;
use assetgate_processing::{MediaValidator, SourceImage};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

const FALLBACK_FILENAME: &str = "unknown";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Files from one multipart request plus the optional `prefix` text field.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<SourceImage>,
    pub prefix: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Collect every part named `file_field`. Each file is size-checked as it
/// arrives and the count is checked once the form is exhausted.
pub async fn read_upload_form(
    mut multipart: Multipart,
    file_field: &str,
    validator: &MediaValidator,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == file_field {
            // Stop reading as soon as the form goes over the limit.
            validator.validate_file_count(form.files.len() + 1)?;

            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
            let data = field.bytes().await.map_err(multipart_error)?;

            validator.validate_file_size(data.len())?;
            form.files
                .push(SourceImage::from_upload(filename, content_type, data));
        } else if field_name == "prefix" {
            let value = field.text().await.map_err(multipart_error)?;
            if !value.is_empty() {
                form.prefix = Some(value);
            }
        }
    }

    validator.validate_file_count(form.files.len())?;
    Ok(form)
}

/// Read exactly one part named `file_field`.
pub async fn read_single_file(
    multipart: Multipart,
    file_field: &str,
    validator: &MediaValidator,
) -> Result<SourceImage, AppError> {
    let single = MediaValidator::new(validator.max_file_size(), 1);
    let mut form = read_upload_form(multipart, file_field, &single).await?;
    form.files
        .pop()
        .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
