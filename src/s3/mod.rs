use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;

pub mod endpoint;
pub mod multipart;
pub mod object;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use endpoint::EndpointResolver;
pub use object::put_file;
pub use session::{Session, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unable to open file {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to read file {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transfer(#[from] s3::Error),
    #[error("response is missing {0}")]
    MissingField(&'static str),
    #[error("object needs more than {0} parts")]
    TooManyParts(usize),
}

/// The store operations a managed upload needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError>;

    /// Returns the upload id.
    async fn create_upload(&self, bucket: &str, key: &str) -> Result<String, UploadError>;

    async fn put_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, UploadError>;

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), UploadError>;

    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str)
        -> Result<(), UploadError>;
}
