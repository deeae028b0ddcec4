//! Error types for the `svg_sanitizer` crate.

/// All errors that can occur while sanitizing or storing SVG uploads.
#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    /// The input does not declare itself as `image/svg+xml` (or, for the
    /// uploader, does not carry a `.svg` filename).
    #[error("File is not an SVG: {0}")]
    NotSvg(String),

    /// Sanitization left no valid `<svg>...</svg>` envelope.
    #[error("Failed to sanitize SVG: {0}")]
    Sanitize(String),

    /// Reading the file contents failed.
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The file exceeds the uploader's size limit.
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    /// A storage backend failed to persist content.
    #[error("Storage upload failed: {0}")]
    StorageUpload(Box<dyn std::error::Error + Send + Sync>),

    /// The builder configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

/// A type alias for `Result<T, SvgError>`.
pub type Result<T> = std::result::Result<T, SvgError>;
