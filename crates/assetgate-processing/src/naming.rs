//! Key naming
//!
//! Storage keys have the shape `[prefix/][timestamp-]base[_suffix].ext`.
//! Response keys use the same join rule, drop the extension into `e` and
//! usually omit the device suffix.

use assetgate_core::models::ResponseKey;
use assetgate_core::Device;

/// A filename split at its last dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub base_name: String,
    pub extension: String,
}

pub fn split_name(filename: &str) -> NameParts {
    match filename.rfind('.') {
        Some(idx) => NameParts {
            base_name: filename[..idx].to_string(),
            extension: filename[idx + 1..].to_string(),
        },
        None => NameParts {
            base_name: filename.to_string(),
            extension: String::new(),
        },
    }
}

/// Filename suffix for a device; no device means no suffix.
pub fn device_suffix(device: Option<Device>) -> &'static str {
    device.map(Device::suffix).unwrap_or("")
}

pub fn build_filename(base: &str, ext: &str, suffix: Option<&str>) -> String {
    match suffix.filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{}_{}.{}", base, suffix, ext),
        None => format!("{}.{}", base, ext),
    }
}

/// `[prefix/][timestamp-]name`, where an empty prefix adds nothing.
fn join_key(prefix: &str, timestamp: Option<i64>, name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + name.len() + 16);
    if !prefix.is_empty() {
        key.push_str(prefix);
        key.push('/');
    }
    if let Some(ts) = timestamp {
        key.push_str(&ts.to_string());
        key.push('-');
    }
    key.push_str(name);
    key
}

pub fn build_storage_key(
    prefix: &str,
    timestamp: Option<i64>,
    base: &str,
    suffix: Option<&str>,
    ext: &str,
) -> String {
    join_key(prefix, timestamp, &build_filename(base, ext, suffix))
}

pub fn build_response_key(
    prefix: &str,
    timestamp: Option<i64>,
    base: &str,
    ext: &str,
    category: Option<&str>,
) -> ResponseKey {
    ResponseKey {
        k: join_key(prefix, timestamp, base),
        e: format!(".{}", ext),
        c: category.map(str::to_string),
    }
}

/// Response key for a single device variant; `k` keeps the device suffix.
pub fn build_variant_response_key(
    prefix: &str,
    timestamp: Option<i64>,
    base: &str,
    suffix: &str,
    ext: &str,
) -> ResponseKey {
    build_response_key(prefix, timestamp, &format!("{}_{}", base, suffix), ext, None)
}
