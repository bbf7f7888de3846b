use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{BlobDescriptor, CatalogStore, MediaStore, StoreError, VideoRecord};

/// In-memory stand-ins for the Redis catalog and the S3 media store,
/// switchable into a failing state to exercise the 5xx paths.
#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<Vec<VideoRecord>>,
    failing: AtomicBool,
}

impl MemoryCatalog {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(anyhow::anyhow!("catalog store is down")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn append(&self, record: &VideoRecord) -> Result<(), StoreError> {
        self.check()?;
        self.records.lock().expect("poisoned").push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<VideoRecord>, StoreError> {
        self.check()?;
        Ok(self.records.lock().expect("poisoned").clone())
    }
}

#[derive(Default)]
pub struct MemoryMediaStore {
    blobs: Mutex<Vec<(String, Bytes)>>,
    failing: AtomicBool,
}

impl MemoryMediaStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().expect("poisoned").len()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn put(&self, filename: &str, body: Bytes) -> Result<BlobDescriptor, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow::anyhow!("media store is down")));
        }

        let descriptor = BlobDescriptor {
            url: format!("http://blobs.local/{filename}"),
            pathname: filename.to_owned(),
            content_type: super::s3::sniff_content_type(&body),
            size: body.len(),
        };

        self.blobs.lock().expect("poisoned").push((filename.to_owned(), body));

        Ok(descriptor)
    }
}
