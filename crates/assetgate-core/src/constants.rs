//! Shared constants

/// Category whose device slots hold per-file size lists instead of a single size.
pub const SCHOOL_THUMBNAIL_CATEGORY: &str = "school-thumbnail";

/// Prefix used when a validated prefix is missing or not allow-listed.
pub const DEFAULT_PREFIX: &str = "images";

/// Prefixes accepted by validated entry points.
pub const UPLOAD_PREFIXES: &[&str] = &[
    "default",
    "1",
    "tieu-chi",
    "news",
    "avatars",
    "user",
    "avatar-review",
];

/// Default scratch root for staged variants.
pub const DEFAULT_SCRATCH_DIR: &str = "tmp";
