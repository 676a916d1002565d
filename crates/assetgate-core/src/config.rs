//! Configuration module
//!
//! Settings are read once at startup from the environment (after loading a
//! `.env` file if present). Legacy variable names are accepted as fallbacks.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_PREFIX, DEFAULT_SCRATCH_DIR, UPLOAD_PREFIXES};
use crate::models::CategoryTable;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 5000;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_FILES: usize = 10;
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Allow-list used to sanitize the storage folder requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPolicy {
    allowed: Vec<String>,
    default: String,
}

impl Default for PrefixPolicy {
    fn default() -> Self {
        Self {
            allowed: UPLOAD_PREFIXES.iter().map(|p| p.to_string()).collect(),
            default: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl PrefixPolicy {
    pub fn new(allowed: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            allowed,
            default: default.into(),
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default
    }

    /// Resolve the folder a file is stored under.
    ///
    /// Without validation the request is used verbatim (absent becomes an
    /// empty prefix). With validation anything outside the allow-list falls
    /// back to the default.
    pub fn resolve(&self, requested: Option<&str>, validate: bool) -> String {
        if !validate {
            return requested.unwrap_or_default().to_string();
        }
        match requested {
            Some(prefix) if !prefix.is_empty() && self.allowed.iter().any(|p| p == prefix) => {
                prefix.to_string()
            }
            _ => self.default.clone(),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Spaces, ...)
    pub cdn_base_url: Option<String>,
    pub s3_public_read: bool, // Send `x-amz-acl: public-read` with every put
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload handling
    pub scratch_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_files: usize,
    pub prefix_policy: PrefixPolicy,
    pub categories_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            storage_backend: StorageBackend::S3,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            cdn_base_url: None,
            s3_public_read: true,
            local_storage_path: None,
            local_storage_base_url: None,
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files: MAX_FILES,
            prefix_policy: PrefixPolicy::default(),
            categories_path: None,
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
        }
    }
}

/// First variable that is set, in order.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok())
        .filter(|value| !value.trim().is_empty())
}

/// Lenient boolean parsing for feature flags; anything unrecognised is `None`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment =
            env_any(&["ENVIRONMENT", "APP_ENV"]).unwrap_or_else(|| "development".to_string());

        let cors_origins_str =
            env_any(&["CORS_ORIGINS", "ALLOW_ORIGIN"]).unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_prefixes = env::var("UPLOAD_PREFIXES")
            .map(|value| split_list(&value))
            .unwrap_or_else(|_| UPLOAD_PREFIXES.iter().map(|p| p.to_string()).collect());
        let default_prefix = env_any(&["DEFAULT_PREFIX"]).unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let config = Config {
            environment,
            server_port: env_any(&["APP_PORT", "SERVER_PORT"])
                .and_then(|port| port.parse().ok())
                .unwrap_or(SERVER_PORT),
            cors_origins: split_list(&cors_origins_str),
            storage_backend,
            s3_bucket: env_any(&["S3_BUCKET", "AWS_S3_BUCKET"]),
            s3_region: env_any(&["S3_REGION", "AWS_DEFAULT_REGION"]),
            s3_endpoint: env_any(&["S3_ENDPOINT", "AWS_S3_URL"]),
            cdn_base_url: env_any(&["CDN_BASE_URL", "AWS_CDN_BASE"]),
            s3_public_read: env_any(&["S3_PUBLIC_READ"])
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            local_storage_path: env_any(&["LOCAL_STORAGE_PATH"]),
            local_storage_base_url: env_any(&["LOCAL_STORAGE_BASE_URL"]),
            scratch_dir: env_any(&["SCRATCH_DIR"])
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR)),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files: env::var("MAX_FILES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_FILES),
            prefix_policy: PrefixPolicy::new(allowed_prefixes, default_prefix),
            categories_path: env_any(&["CATEGORIES_PATH"]).map(PathBuf::from),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(FETCH_TIMEOUT_SECS),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.s3_endpoint.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or S3_ENDPOINT must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        if self.max_files == 0 {
            return Err(anyhow::anyhow!("MAX_FILES must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Category table from `CATEGORIES_PATH`, or the built-in one.
    pub fn load_categories(&self) -> Result<CategoryTable, anyhow::Error> {
        match &self.categories_path {
            Some(path) => CategoryTable::from_path(path),
            None => CategoryTable::builtin(),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn prefix_policy(&self) -> &PrefixPolicy {
        &self.prefix_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_validation_is_verbatim() {
        let policy = PrefixPolicy::default();
        assert_eq!(policy.resolve(Some("anything/goes"), false), "anything/goes");
        assert_eq!(policy.resolve(None, false), "");
    }

    #[test]
    fn test_resolve_with_validation() {
        let policy = PrefixPolicy::default();
        assert_eq!(policy.resolve(Some("news"), true), "news");
        assert_eq!(policy.resolve(Some("evil"), true), "images");
        assert_eq!(policy.resolve(Some(""), true), "images");
        assert_eq!(policy.resolve(None, true), "images");
    }

    #[test]
    fn test_resolve_is_pure() {
        let policy = PrefixPolicy::new(vec!["a".to_string()], "z");
        let first = policy.resolve(Some("a"), true);
        let second = policy.resolve(Some("a"), true);
        assert_eq!(first, second);
        assert_eq!(policy.resolve(Some("b"), true), "z");
    }

    #[test]
    fn test_validate_storage_settings() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            s3_bucket: Some("bucket".to_string()),
            s3_region: Some("ap-southeast-1".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        let config = Config {
            storage_backend: StorageBackend::Local,
            local_storage_path: Some("/tmp/assets".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            storage_backend: StorageBackend::Memory,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_categories_defaults_to_builtin() {
        let categories = Config::default().load_categories().unwrap();
        assert!(categories.get(Some("avatar")).is_some());
    }

    #[test]
    fn test_s3_objects_are_public_by_default() {
        assert!(Config::default().s3_public_read);
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_split_list_trims_entries() {
        assert_eq!(split_list(" a, b ,,c"), vec!["a", "b", "c"]);
    }
}
