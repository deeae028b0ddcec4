//! Builder for configuring an [`SvgUploader`].

use crate::error::{Result, SvgError};
use crate::storage::Storage;
use crate::upload::SvgUploader;

/// Default upload size limit: 5 MiB.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Builder for configuring an [`SvgUploader`].
///
/// Provides a fluent API for the storage key prefix and the upload size limit.
///
/// # Example
///
/// ```rust,no_run
/// use svg_sanitizer::{FsStorage, SvgUploaderBuilder};
///
/// let uploader = SvgUploaderBuilder::new(FsStorage::new("/tmp/media"))
///     .prefix("banners")
///     .max_bytes(1024 * 1024)
///     .build()
///     .unwrap();
/// ```
pub struct SvgUploaderBuilder<S: Storage> {
    storage: S,
    prefix: String,
    max_bytes: usize,
}

impl<S: Storage> SvgUploaderBuilder<S> {
    /// Create a new builder with the given storage backend.
    ///
    /// Defaults: no prefix, [`DEFAULT_MAX_BYTES`] size limit.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            prefix: String::new(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Set a prefix that is prepended to every storage key (separated by `/`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim_matches('/').to_string();
        self
    }

    /// Largest accepted upload, in bytes of text content.
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Consume the builder and return the configured [`SvgUploader`].
    ///
    /// Fails with [`SvgError::Config`] if the size limit is zero.
    pub fn build(self) -> Result<SvgUploader<S>> {
        if self.max_bytes == 0 {
            return Err(SvgError::Config("max_bytes must be greater than zero".into()));
        }
        Ok(SvgUploader::new(self.storage, self.prefix, self.max_bytes))
    }
}
