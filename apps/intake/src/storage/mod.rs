use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Backend(String),
}

/// Destination for uploaded application documents.
///
/// `put` returns the publicly resolvable URL of the stored object.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, UploadError>;
    async fn remove(&self, key: &str) -> Result<(), UploadError>;
}

pub struct S3UploadStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3UploadStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UploadStore for S3UploadStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, UploadError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| UploadError::Backend(DisplayErrorContext(&e).to_string()))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(public_url(&self.public_base_url, key))
    }

    async fn remove(&self, key: &str) -> Result<(), UploadError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| UploadError::Backend(DisplayErrorContext(&e).to_string()))?;

        info!("Removed s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Builds `uploads/<YYYY>/<MM>/<uuid>-<stem>.<extension>`.
///
/// `safe_file_name` must already be sanitized; its own extension is replaced
/// by the one resolved from the file content.
pub fn upload_key(now: DateTime<Utc>, safe_file_name: &str, extension: &str) -> String {
    let stem = match safe_file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => safe_file_name,
    };
    let stem = if stem.is_empty() { "document" } else { stem };
    format!(
        "uploads/{:04}/{:02}/{}-{}.{}",
        now.year(),
        now.month(),
        Uuid::new_v4(),
        stem,
        extension
    )
}
