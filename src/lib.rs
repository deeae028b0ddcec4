//! # svg_sanitizer
//!
//! Sanitization of untrusted, user-uploaded SVG images, plus the upload path
//! that stores the cleaned result in object storage.
//!
//! ## Overview
//!
//! [`sanitize_svg`] removes script-execution vectors from SVG markup:
//! dangerous elements (`script`, `iframe`, `object`, ...), event-handler and
//! resource attributes (`onload`, `href`, `src`, ...), unsafe CSS in `<style>`
//! blocks and `style` attributes, DOCTYPE and XML declarations, CDATA sections
//! and script comments. It returns the cleaned markup together with a
//! [`SanitizeResult`] audit trail of what was removed, and fails if no
//! `<svg>...</svg>` envelope is left.
//!
//! Matching is regex-based so malformed markup is tolerated. All hyperlinks
//! are removed, including relative ones.
//!
//! [`SvgUploader`] wires the sanitizer to a [`Storage`] backend (local
//! filesystem, S3/MinIO, or your own implementation).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use svg_sanitizer::{FsStorage, SvgUploaderBuilder, UploadedFile, sanitize_svg};
//!
//! let result = sanitize_svg(r#"<svg onload="evil()"><rect/></svg>"#).unwrap();
//! assert_eq!(result.sanitized_svg, "<svg><rect/></svg>");
//! assert_eq!(result.removed_attributes, vec!["onload"]);
//!
//! # async fn example() -> svg_sanitizer::Result<()> {
//! let uploader = SvgUploaderBuilder::new(FsStorage::new("/tmp/media"))
//!     .prefix("banners")
//!     .build()?;
//!
//! let file = UploadedFile::new("banner.svg", "image/svg+xml", "<svg><rect/></svg>");
//! let stored = uploader.upload(&file).await?;
//! assert_eq!(stored.key, "banners/banner.svg");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `s3` | **yes** | Enables [`S3Storage`] and re-exports from `aws-sdk-s3` / `aws-config`. |
//! | `rustls-tls` | no | Use `rustls` instead of the platform TLS for the AWS SDK. |

pub mod config;
pub mod error;
pub mod file;
pub mod sanitizer;
pub mod storage;
pub mod upload;

pub use config::{DEFAULT_MAX_BYTES, SvgUploaderBuilder};
pub use error::{Result, SvgError};
pub use file::{
    FsFile, SVG_MIME_TYPE, SvgFile, UploadedFile, create_svg_buffer, is_svg_file,
    sanitize_svg_file,
};
pub use sanitizer::{
    STYLE_REMOVED, SanitizeResult, SvgSanitizer, is_dangerous_css, is_dangerous_url,
    sanitize_svg,
};
#[cfg(feature = "s3")]
pub use storage::{Credentials, Region, S3Client, S3Config, S3ConfigBuilder, S3Storage};
pub use storage::{FsStorage, Storage};
pub use upload::{StoredSvg, SvgUploader};
