//! Types for the upload pipeline.

/// Per-call switches for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Check the requested prefix against the allow-list.
    pub validate_prefix: bool,
    /// Put the `timestamp-` segment in keys.
    pub add_timestamp: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            validate_prefix: false,
            add_timestamp: true,
        }
    }
}

impl UploadOptions {
    /// Options for entry points that sanitize the caller's prefix.
    pub fn validated() -> Self {
        Self {
            validate_prefix: true,
            ..Self::default()
        }
    }
}
