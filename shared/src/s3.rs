//! S3-backed blob store.

use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::store::BlobStore;
use crate::{Error, Result};

/// Override blobs stored as `<prefix><date>` objects in one bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Build a client from the default AWS config chain.
    ///
    /// A custom endpoint (e.g. a local S3 emulator) switches to path-style
    /// addressing.
    pub async fn connect(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        endpoint_url: Option<&str>,
    ) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url).force_path_style(true);
        }
        Self::new(S3Client::from_conf(builder.build()), bucket, prefix)
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl BlobStore for S3Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                return match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => Ok(None),
                    err => Err(Error::Store(format!("Failed to read {}: {}", key, err))),
                };
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Error::Store(format!("Failed to read body of {}: {}", key, e)))?;

        String::from_utf8(data.into_bytes().to_vec())
            .map(Some)
            .map_err(|e| Error::Store(format!("Blob {} is not UTF-8: {}", key, e)))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .content_type("application/json")
            .body(ByteStream::from(value.into_bytes()))
            .send()
            .await
            .map_err(|e| Error::Store(format!("Failed to write {}: {}", key, e)))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| Error::Store(format!("Failed to list keys: {}", e)))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter_map(|key| key.strip_prefix(self.prefix.as_str()))
                    .filter(|key| !key.is_empty())
                    .map(String::from),
            );

            match page.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| Error::Store(format!("Failed to delete {}: {}", key, e)))?;
        Ok(())
    }
}
