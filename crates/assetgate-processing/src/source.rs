//! Source images: uploaded parts and remote URLs.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::ProcessingError;

const USER_AGENT: &str = "ImageTransfer/1.0";
const DEFAULT_EXTENSION: &str = "jpg";
pub(crate) const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw bytes of one input file, consumed by the upload that uses it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

impl SourceImage {
    pub fn from_upload(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    /// Download `url` through `reader`.
    pub async fn from_url(
        reader: &SourceReader,
        url: &str,
        clock: &dyn Clock,
    ) -> Result<Self, ProcessingError> {
        reader.fetch(url, clock).await
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Downloads remote files into `SourceImage`s.
#[derive(Clone)]
pub struct SourceReader {
    client: reqwest::Client,
}

impl SourceReader {
    pub fn new(timeout: Duration) -> Result<Self, ProcessingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProcessingError::Task(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch `url`. Only HTTP(S) is accepted and any non-2xx status fails.
    #[tracing::instrument(skip(self, clock))]
    pub async fn fetch(&self, url: &str, clock: &dyn Clock) -> Result<SourceImage, ProcessingError> {
        let parsed = Url::parse(url).map_err(|e| ProcessingError::fetch(url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProcessingError::fetch(
                url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let start = std::time::Instant::now();
        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| ProcessingError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProcessingError::fetch(url, format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
        if !content_type.starts_with("image/") {
            tracing::warn!(url = %url, content_type = %content_type, "URL may not be an image");
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| ProcessingError::fetch(url, e))?;

        let filename = filename_from_url(&parsed, clock.now_millis());

        tracing::info!(
            url = %url,
            filename = %filename,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched remote source"
        );

        Ok(SourceImage {
            data,
            filename,
            content_type,
        })
    }
}

/// Last path segment of the URL, `image_<ms>` when there is none, with a
/// `.jpg` extension added when the segment has no extension.
fn filename_from_url(url: &Url, now_millis: i64) -> String {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("image_{}", now_millis));

    if name.contains('.') {
        name
    } else {
        format!("{}.{}", name, DEFAULT_EXTENSION)
    }
}
