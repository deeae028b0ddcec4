//! Amazon S3 / MinIO storage backend (requires the `s3` feature).

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};

use crate::error::{Result, SvgError};
use crate::storage::Storage;

/// Storage backend that uploads objects to an Amazon S3 or S3-compatible
/// bucket such as MinIO.
///
/// # Example
///
/// ```rust,ignore
/// use svg_sanitizer::S3Storage;
///
/// let storage = S3Storage::minio("http://localhost:9000", "minio", "minio123", "media");
/// ```
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new `S3Storage` with an existing [`Client`] and bucket name.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Create an `S3Storage` from an [`aws_sdk_s3::Config`].
    pub fn from_conf(config: aws_sdk_s3::Config, bucket: impl Into<String>) -> Self {
        let client = Client::from_conf(config);
        Self::new(client, bucket)
    }

    /// Create an `S3Storage` for a MinIO (or other S3-compatible) endpoint
    /// using static credentials and path-style addressing.
    pub fn minio(
        endpoint: impl Into<String>,
        access_key: &str,
        secret_key: &str,
        bucket: impl Into<String>,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "svg-sanitizer");
        let config = aws_sdk_s3::Config::builder()
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        Self::from_conf(config, bucket)
    }

    /// Create an `S3Storage` using credentials and region from the AWS
    /// environment (env vars, config files, IMDS, etc.).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        let client = Client::new(&config);
        Self::new(client, bucket)
    }
}

impl Storage for S3Storage {
    async fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(content.to_vec().into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| SvgError::StorageUpload(Box::new(e)))?;

        tracing::debug!(
            "Uploaded {} bytes to s3://{}/{}",
            content.len(),
            self.bucket,
            key
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SvgError::StorageUpload(Box::new(e)))?;

        tracing::debug!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
