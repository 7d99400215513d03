use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{ObjectStore, UploadError};

pub const PART_SIZE: usize = 8_388_608;
pub const MAX_PARTS: usize = 10_000;

/// Grows `base` so that a body of `len` bytes fits in at most [`MAX_PARTS`] parts.
pub(crate) fn part_size_for(len: u64, base: usize) -> usize {
    let needed = usize::try_from(len.div_ceil(MAX_PARTS as u64)).unwrap_or(usize::MAX);
    needed.max(base)
}

/// Reads up to `part_size` bytes, fewer only at end of stream.
pub(crate) async fn read_part<R>(
    reader: &mut R,
    key: &str,
    part_size: usize,
) -> Result<Bytes, UploadError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(part_size);
    reader
        .take(part_size as u64)
        .read_to_end(&mut buf)
        .await
        .map_err(|source| UploadError::Read {
            name: key.to_owned(),
            source,
        })?;
    Ok(Bytes::from(buf))
}

/// Uploads `first` and the rest of `reader` as parts of one multipart upload.
/// The upload is aborted if any part or the completion fails.
pub(crate) async fn upload_parts<S, R>(
    store: &S,
    bucket: &str,
    key: &str,
    first: Bytes,
    reader: &mut R,
    part_size: usize,
) -> Result<(), UploadError>
where
    S: ObjectStore + ?Sized,
    R: AsyncRead + Unpin,
{
    let upload_id = store.create_upload(bucket, key).await?;
    tracing::debug!(bucket, key, %upload_id, "multipart upload started");

    let result = match send_parts(store, bucket, key, &upload_id, first, reader, part_size).await {
        Ok(parts) => store.complete_upload(bucket, key, &upload_id, parts).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        tracing::warn!(bucket, key, %upload_id, "multipart upload failed: {err}");
        if let Err(abort_err) = store.abort_upload(bucket, key, &upload_id).await {
            tracing::warn!(bucket, key, %upload_id, "failed to abort multipart upload: {abort_err}");
        }
    }
    result
}

async fn send_parts<S, R>(
    store: &S,
    bucket: &str,
    key: &str,
    upload_id: &str,
    first: Bytes,
    reader: &mut R,
    part_size: usize,
) -> Result<Vec<CompletedPart>, UploadError>
where
    S: ObjectStore + ?Sized,
    R: AsyncRead + Unpin,
{
    let mut completed_parts: Vec<CompletedPart> = Vec::new();
    let mut part_number = 1;
    let mut chunk = first;

    loop {
        if completed_parts.len() == MAX_PARTS {
            return Err(UploadError::TooManyParts(MAX_PARTS));
        }
        tracing::trace!(part_number, bytes = chunk.len(), "uploading part");
        let part = store
            .put_part(bucket, key, upload_id, part_number, chunk)
            .await?;
        completed_parts.push(part);

        chunk = read_part(reader, key, part_size).await?;
        if chunk.is_empty() {
            break;
        }
        part_number += 1;
    }

    Ok(completed_parts)
}
