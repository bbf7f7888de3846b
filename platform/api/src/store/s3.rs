use async_trait::async_trait;
use bytes::Bytes;
use common::s3::{Bucket, ObjectCannedAcl, PutObjectOptions};

use super::{BlobDescriptor, MediaStore, StoreError};

/// Media store on an S3 bucket. Objects are keyed by the uploaded
/// filename and served publicly from the bucket's public URL.
pub struct S3MediaStore {
    bucket: Bucket,
}

impl S3MediaStore {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }
}

/// Sniff the payload, falling back to a generic type when the format is
/// not recognized.
pub fn sniff_content_type(body: &[u8]) -> String {
    if body.is_empty() {
        return "application/octet-stream".to_owned();
    }

    file_format::FileFormat::from_bytes(body).media_type().to_owned()
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put(&self, filename: &str, body: Bytes) -> Result<BlobDescriptor, StoreError> {
        let content_type = sniff_content_type(&body);
        let size = body.len();

        self.bucket
            .put_object(
                filename,
                body.to_vec(),
                Some(PutObjectOptions {
                    acl: Some(ObjectCannedAcl::PublicRead),
                    content_type: Some(content_type.clone()),
                }),
            )
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        Ok(BlobDescriptor {
            url: self.bucket.object_url(filename),
            pathname: filename.to_owned(),
            content_type,
            size,
        })
    }
}
