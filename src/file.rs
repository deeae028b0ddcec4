//! The [`SvgFile`] trait for upload inputs, and the file-level entry points
//! built on [`sanitize_svg`].

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{Result, SvgError};
use crate::sanitizer::{SanitizeResult, sanitize_svg};

/// Media type every SVG upload must declare.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Trait implemented by uploaded files: a declared media type, a filename,
/// and a one-shot read of the full text content.
///
/// # Example
///
/// ```
/// use svg_sanitizer::{Result, SvgFile};
///
/// struct FormPart {
///     filename: String,
///     content_type: String,
///     body: Vec<u8>,
/// }
///
/// impl SvgFile for FormPart {
///     fn media_type(&self) -> &str {
///         &self.content_type
///     }
///
///     fn name(&self) -> &str {
///         &self.filename
///     }
///
///     async fn text(&self) -> Result<String> {
///         Ok(String::from_utf8_lossy(&self.body).into_owned())
///     }
/// }
/// ```
pub trait SvgFile: Send + Sync {
    /// The declared MIME type, e.g. `"image/svg+xml"`.
    fn media_type(&self) -> &str;

    /// The client-supplied filename.
    fn name(&self) -> &str;

    /// Reads the whole content as text. Invalid UTF-8 is replaced, not rejected.
    fn text(&self) -> impl Future<Output = Result<String>> + Send;
}

/// An upload held in memory, as received from a multipart form.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl SvgFile for UploadedFile {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn text(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.bytes).into_owned())
    }
}

/// A file on the local filesystem with a caller-declared media type.
#[derive(Clone, Debug)]
pub struct FsFile {
    path: PathBuf,
    name: String,
    media_type: String,
}

impl FsFile {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self {
            path,
            name,
            media_type: media_type.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SvgFile for FsFile {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn text(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns `true` if the file declares `image/svg+xml` **and** its name ends
/// in `.svg` (case-insensitive).
///
/// Callers use this to choose between the SVG sanitizing path and raster
/// conversion.
pub fn is_svg_file(file: &impl SvgFile) -> bool {
    file.media_type() == SVG_MIME_TYPE && file.name().to_lowercase().ends_with(".svg")
}

/// Reads and sanitizes an uploaded SVG.
///
/// Fails with [`SvgError::NotSvg`] before reading anything if the declared
/// media type is not `image/svg+xml`.
pub async fn sanitize_svg_file(file: &impl SvgFile) -> Result<SanitizeResult> {
    if file.media_type() != SVG_MIME_TYPE {
        return Err(SvgError::NotSvg(format!(
            "{} has media type {:?}",
            file.name(),
            file.media_type()
        )));
    }
    let text = file.text().await?;
    sanitize_svg(&text)
}

/// Encodes sanitized markup as UTF-8 bytes for storage.
pub fn create_svg_buffer(sanitized_svg: &str) -> Vec<u8> {
    sanitized_svg.as_bytes().to_vec()
}
