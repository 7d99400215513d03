use std::time::Instant;

use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use s3::primitives::ByteStream;
use tokio::fs::File;
use tokio::io::AsyncRead;

use super::multipart::{self, PART_SIZE};
use super::{ObjectStore, UploadError};
use crate::cli::UploadRequest;

#[async_trait]
impl ObjectStore for s3::Client {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(s3::Error::from)?;
        Ok(())
    }

    async fn create_upload(&self, bucket: &str, key: &str) -> Result<String, UploadError> {
        let response = self
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(s3::Error::from)?;
        response.upload_id.ok_or(UploadError::MissingField("UploadId"))
    }

    async fn put_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, UploadError> {
        let response = self
            .upload_part()
            .body(ByteStream::from(body))
            .bucket(bucket)
            .key(key)
            .part_number(part_number)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(s3::Error::from)?;
        let e_tag = response.e_tag.ok_or(UploadError::MissingField("ETag"))?;

        Ok(CompletedPart::builder()
            .part_number(part_number)
            .e_tag(e_tag)
            .build())
    }

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), UploadError> {
        let completed_multipart_upload = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();
        self.complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed_multipart_upload)
            .send()
            .await
            .map_err(s3::Error::from)?;
        Ok(())
    }

    async fn abort_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), UploadError> {
        self.abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(s3::Error::from)?;
        Ok(())
    }
}

/// Opens `request.source` and uploads it to `request.bucket` under `request.key`.
///
/// Nothing is sent to the store when the file cannot be opened.
pub async fn put_file<S>(store: &S, request: &UploadRequest) -> Result<(), UploadError>
where
    S: ObjectStore + ?Sized,
{
    let file = File::open(&request.source)
        .await
        .map_err(|source| UploadError::Open {
            name: request.key.clone(),
            source,
        })?;
    let len = file
        .metadata()
        .await
        .map_err(|source| UploadError::Read {
            name: request.key.clone(),
            source,
        })?
        .len();
    let part_size = multipart::part_size_for(len, PART_SIZE);

    let start_time = Instant::now();
    upload_with_part_size(store, &request.bucket, &request.key, file, part_size).await?;
    tracing::info!(
        "success: {} -> {} | time elapsed: {:?}",
        request.key,
        request.bucket,
        start_time.elapsed()
    );
    Ok(())
}

/// Streams `reader` to the store, switching to a multipart upload when the
/// body does not fit in a single part. `reader` is dropped before returning.
#[allow(dead_code)]
pub async fn upload<S, R>(store: &S, bucket: &str, key: &str, reader: R) -> Result<(), UploadError>
where
    S: ObjectStore + ?Sized,
    R: AsyncRead + Unpin,
{
    upload_with_part_size(store, bucket, key, reader, PART_SIZE).await
}

pub(crate) async fn upload_with_part_size<S, R>(
    store: &S,
    bucket: &str,
    key: &str,
    mut reader: R,
    part_size: usize,
) -> Result<(), UploadError>
where
    S: ObjectStore + ?Sized,
    R: AsyncRead + Unpin,
{
    let first = multipart::read_part(&mut reader, key, part_size).await?;
    if first.len() < part_size {
        tracing::debug!(bucket, key, bytes = first.len(), "single request upload");
        return store.put(bucket, key, first).await;
    }
    multipart::upload_parts(store, bucket, key, first, &mut reader, part_size).await
}
