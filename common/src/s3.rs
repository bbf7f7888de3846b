use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::delete_object::DeleteObjectError;
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
pub use aws_sdk_s3::types::ObjectCannedAcl;

use crate::config::{S3BucketConfig, S3CredentialsConfig};

#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    public_url: String,
    client: aws_sdk_s3::Client,
}

#[derive(Debug, Clone, Default)]
pub struct PutObjectOptions {
    pub acl: Option<ObjectCannedAcl>,
    pub content_type: Option<String>,
}

impl From<S3CredentialsConfig> for Credentials {
    fn from(value: S3CredentialsConfig) -> Self {
        Self::from_keys(
            value.access_key.unwrap_or_default(),
            value.secret_key.unwrap_or_default(),
            None,
        )
    }
}

impl S3BucketConfig {
    pub fn setup(&self) -> Bucket {
        Bucket::new(
            self.name.clone(),
            self.public_url.clone(),
            self.credentials.clone().into(),
            Region::new(self.region.clone()),
            self.endpoint.clone(),
        )
    }
}

impl Bucket {
    pub fn new(
        name: String,
        public_url: String,
        credentials: Credentials,
        region: Region,
        endpoint: Option<String>,
    ) -> Self {
        let config = if let Some(endpoint) = endpoint {
            aws_sdk_s3::config::Builder::new().endpoint_url(endpoint)
        } else {
            aws_sdk_s3::config::Builder::new()
        }
        .region(region)
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();

        let client = aws_sdk_s3::Client::from_conf(config);

        Self {
            name,
            public_url,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public URL for an object key, based on the configured serving base.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }

    pub async fn get_object(&self, key: &str) -> Result<GetObjectOutput, SdkError<GetObjectError>> {
        self.client.get_object().bucket(self.name()).key(key).send().await
    }

    pub async fn put_object(
        &self,
        key: impl Into<String>,
        body: impl Into<ByteStream>,
        options: Option<PutObjectOptions>,
    ) -> Result<(), SdkError<PutObjectError>> {
        let options = options.unwrap_or_default();

        self.client
            .put_object()
            .bucket(self.name())
            .key(key)
            .body(body.into())
            .set_acl(options.acl)
            .set_content_type(options.content_type)
            .send()
            .await?;

        Ok(())
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), SdkError<DeleteObjectError>> {
        self.client.delete_object().bucket(self.name()).key(key).send().await?;

        Ok(())
    }
}
