use reqwest::Url;

/// Request validation errors for uploads and URL transfers
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,

    #[error("No files uploaded")]
    NoFiles,

    #[error("Too many files: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("No URLs provided")]
    NoUrls,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Upload request validator
///
/// Checks the request shape at the HTTP boundary. Format checks are left to
/// the image decoder.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    max_files: usize,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, max_files: usize) -> Self {
        Self {
            max_file_size,
            max_files,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_file_count(&self, count: usize) -> Result<(), ValidationError> {
        if count == 0 {
            return Err(ValidationError::NoFiles);
        }
        if count > self.max_files {
            return Err(ValidationError::TooManyFiles {
                count,
                max: self.max_files,
            });
        }
        Ok(())
    }

    /// Every URL must parse and use HTTP(S); the list must not be empty.
    pub fn validate_urls(&self, urls: &[String]) -> Result<(), ValidationError> {
        if urls.is_empty() {
            return Err(ValidationError::NoUrls);
        }
        if urls.len() > self.max_files {
            return Err(ValidationError::TooManyFiles {
                count: urls.len(),
                max: self.max_files,
            });
        }
        for url in urls {
            let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl(url.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ValidationError::InvalidUrl(url.clone()));
            }
        }
        Ok(())
    }
}
