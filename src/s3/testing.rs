use std::collections::HashMap;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::types::error::NoSuchBucket;
use aws_sdk_s3::types::CompletedPart;
use bytes::Bytes;
use tokio::io::{AsyncRead, ReadBuf};

use super::{ObjectStore, UploadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put,
    Create,
    Part(i32, usize),
    Complete(Vec<i32>),
    Abort,
}

/// In-memory store recording every call made against it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    calls: Mutex<Vec<Call>>,
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    pending: Mutex<Vec<u8>>,
    fail_put: bool,
    fail_part: Option<i32>,
}

impl MemoryStore {
    pub fn failing_put() -> Self {
        Self {
            fail_put: true,
            ..Self::default()
        }
    }

    pub fn failing_part(part_number: i32) -> Self {
        Self {
            fail_part: Some(part_number),
            ..Self::default()
        }
    }

    pub fn no_such_bucket() -> NoSuchBucket {
        NoSuchBucket::builder()
            .message("The specified bucket does not exist")
            .build()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn transfer_error() -> UploadError {
        UploadError::Transfer(s3::Error::NoSuchBucket(Self::no_such_bucket()))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError> {
        self.record(Call::Put);
        if self.fail_put {
            return Err(Self::transfer_error());
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_owned(), key.to_owned()), body.to_vec());
        Ok(())
    }

    async fn create_upload(&self, _bucket: &str, _key: &str) -> Result<String, UploadError> {
        self.record(Call::Create);
        self.pending.lock().unwrap().clear();
        Ok("upload-1".to_owned())
    }

    async fn put_part(
        &self,
        _bucket: &str,
        _key: &str,
        _upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, UploadError> {
        self.record(Call::Part(part_number, body.len()));
        if self.fail_part == Some(part_number) {
            return Err(Self::transfer_error());
        }
        self.pending.lock().unwrap().extend_from_slice(&body);
        Ok(CompletedPart::builder()
            .part_number(part_number)
            .e_tag(format!("etag-{part_number}"))
            .build())
    }

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        _upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), UploadError> {
        let numbers = parts.iter().filter_map(CompletedPart::part_number).collect();
        self.record(Call::Complete(numbers));
        let body = std::mem::take(&mut *self.pending.lock().unwrap());
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_owned(), key.to_owned()), body);
        Ok(())
    }

    async fn abort_upload(
        &self,
        _bucket: &str,
        _key: &str,
        _upload_id: &str,
    ) -> Result<(), UploadError> {
        self.record(Call::Abort);
        self.pending.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl<'s> ObjectStore for &'s MemoryStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError> {
        (**self).put(bucket, key, body).await
    }

    async fn create_upload(&self, bucket: &str, key: &str) -> Result<String, UploadError> {
        (**self).create_upload(bucket, key).await
    }

    async fn put_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, UploadError> {
        (**self)
            .put_part(bucket, key, upload_id, part_number, body)
            .await
    }

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<(), UploadError> {
        (**self).complete_upload(bucket, key, upload_id, parts).await
    }

    async fn abort_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), UploadError> {
        (**self).abort_upload(bucket, key, upload_id).await
    }
}

/// Reader that counts how many times it has been dropped.
pub struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    drops: Arc<AtomicUsize>,
}

impl TrackedReader {
    pub fn new(data: Vec<u8>) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let reader = Self {
            inner: Cursor::new(data),
            drops: Arc::clone(&drops),
        };
        (reader, drops)
    }
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}
