//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use assetgate_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assetgate API",
        version = "0.1.0",
        description = "Upload gateway: stores raw files and derives category-specific image variants (crop, resize, re-encode) in S3-compatible object storage."
    ),
    paths(
        handlers::health::health_check,
        handlers::file_upload::upload_file,
        handlers::file_upload::upload_multiple_files,
        handlers::file_upload::transfer_file_urls,
        handlers::image_upload::upload_images,
        handlers::image_upload::transfer_image_urls,
        handlers::image_delete::delete_image,
    ),
    components(schemas(
        error::ErrorResponse,
        models::ResponseKey,
        models::GroupedResponse,
        models::UploadResponse,
        models::StoredFile,
        handlers::health::HealthResponse,
        handlers::file_upload::TransferUrlsRequest,
        handlers::file_upload::StoredFileResponse,
        handlers::file_upload::StoredFilesResponse,
        handlers::file_upload::ResponseKeysResponse,
        handlers::image_upload::TransferImagesRequest,
        handlers::image_upload::ImagesUploadedResponse,
        handlers::image_delete::DeleteImageRequest,
        handlers::image_delete::ImageDeletedResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "files", description = "Raw file storage"),
        (name = "images", description = "Category image uploads and deletion")
    )
)]
pub struct ApiDoc;
