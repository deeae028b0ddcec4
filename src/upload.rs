//! The SVG branch of the media upload path: validate, sanitize, store.

use crate::error::{Result, SvgError};
use crate::file::{SVG_MIME_TYPE, SvgFile, create_svg_buffer, is_svg_file};
use crate::sanitizer::{SanitizeResult, sanitize_svg};
use crate::storage::Storage;

/// A sanitized upload that was written to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredSvg {
    /// Storage key the object was written under.
    pub key: String,
    /// Size in bytes of the stored (sanitized) markup.
    pub size: usize,
    /// The sanitization report.
    pub report: SanitizeResult,
}

/// Sanitizes SVG uploads and persists them to a [`Storage`] backend.
///
/// Created with [`SvgUploaderBuilder`](crate::SvgUploaderBuilder). Holds no
/// mutable state, so one uploader can serve concurrent requests.
pub struct SvgUploader<S: Storage> {
    storage: S,
    prefix: String,
    max_bytes: usize,
}

impl<S: Storage> SvgUploader<S> {
    pub(crate) fn new(storage: S, prefix: String, max_bytes: usize) -> Self {
        Self {
            storage,
            prefix,
            max_bytes,
        }
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Sanitize `file` and store it under `{prefix}/{basename}`.
    ///
    /// Nothing is written unless every step succeeds. Errors:
    ///
    /// - [`SvgError::NotSvg`] if [`is_svg_file`] rejects the file.
    /// - [`SvgError::TooLarge`] if the content exceeds the size limit.
    /// - [`SvgError::Sanitize`] if no valid SVG envelope remains.
    /// - [`SvgError::StorageUpload`] if the backend fails.
    pub async fn upload<F: SvgFile>(&self, file: &F) -> Result<StoredSvg> {
        if !is_svg_file(file) {
            return Err(SvgError::NotSvg(format!(
                "{} has media type {:?}",
                file.name(),
                file.media_type()
            )));
        }

        let text = file.text().await?;
        if text.len() > self.max_bytes {
            return Err(SvgError::TooLarge {
                size: text.len(),
                limit: self.max_bytes,
            });
        }

        let report = sanitize_svg(&text)?;
        if report.has_removed_dangerous_content {
            tracing::warn!(
                "Removed dangerous content from {}: elements={:?} attributes={:?}",
                file.name(),
                report.removed_elements,
                report.removed_attributes
            );
        }

        let buffer = create_svg_buffer(&report.sanitized_svg);
        let key = self.key_for(file.name());
        self.storage.put(&key, &buffer, SVG_MIME_TYPE).await?;

        Ok(StoredSvg {
            key,
            size: buffer.len(),
            report,
        })
    }

    /// Upload several files concurrently. Results are returned in input order;
    /// one failure does not affect the others.
    pub async fn upload_all<F: SvgFile>(&self, files: &[F]) -> Vec<Result<StoredSvg>> {
        let futs = files.iter().map(|file| self.upload(file));
        futures::future::join_all(futs).await
    }

    /// Upload `file`, then delete the object it replaces.
    ///
    /// The old object is only removed once the new one is stored. A failed
    /// delete is logged and leaves the old object behind.
    pub async fn replace<F: SvgFile>(&self, previous_key: &str, file: &F) -> Result<StoredSvg> {
        let stored = self.upload(file).await?;
        if stored.key != previous_key {
            if let Err(e) = self.storage.delete(previous_key).await {
                tracing::warn!("Failed to delete replaced object {previous_key}: {e}");
            }
        }
        Ok(stored)
    }

    fn key_for(&self, name: &str) -> String {
        let name = object_name(name);
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }
}

/// Last path segment of a client-supplied filename, so a name like
/// `../../etc/x.svg` cannot escape the prefix.
fn object_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty() && *segment != "..")
        .unwrap_or("upload.svg")
        .to_string()
}
