use async_trait::async_trait;
use bytes::Bytes;
use ulid::Ulid;

pub mod redis;
pub mod s3;

#[cfg(test)]
pub mod memory;

/// One entry in the video catalog. Records are append-only; there is no
/// update or delete.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoRecord {
    pub id: Ulid,
    pub title: String,
    pub src: String,
}

impl VideoRecord {
    /// Builds a record for a freshly uploaded file. The title is the
    /// filename with its final extension stripped.
    pub fn new(filename: &str, src: String) -> Self {
        Self {
            id: Ulid::new(),
            title: derive_title(filename),
            src,
        }
    }
}

pub fn derive_title(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
        _ => filename.to_owned(),
    }
}

/// What the media store reports back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlobDescriptor {
    pub url: String,
    pub pathname: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
    #[error("failed to decode stored record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The catalog is a single ordered list of [`VideoRecord`]s. Append must
/// be atomic on the store itself, a read-modify-write of the whole list
/// loses updates under concurrency.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn append(&self, record: &VideoRecord) -> Result<(), StoreError>;

    /// Returns the full catalog in insertion order, empty if nothing was
    /// ever appended.
    async fn list(&self) -> Result<Vec<VideoRecord>, StoreError>;
}

/// Publicly served blob storage, keyed by filename.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, filename: &str, body: Bytes) -> Result<BlobDescriptor, StoreError>;
}
