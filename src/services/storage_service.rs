use std::time::Duration;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::config::Config;
use crate::error::{Error, Result};

/// Binary resume storage. Implementations return durable URLs from their own
/// addressing scheme and can resolve such a URL back to its object key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;
    async fn signed_get(&self, key: &str, ttl: Duration) -> Result<String>;
    fn object_key(&self, url: &str) -> Option<String>;
}

/// S3-compatible store addressed path-style: `{endpoint}/{bucket}/{key}`.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    endpoint: String,
}

impl S3ObjectStore {
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key,
            &config.aws_secret_key,
            None,
            None,
            "hireflow-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(15))
                    .build(),
            )
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.s3_bucket.clone(),
            endpoint: config.s3_endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::StorageFailed(format!("put {key}: {e}")))?;

        Ok(format!("{}/{}/{}", self.endpoint, self.bucket, key))
    }

    async fn signed_get(&self, key: &str, ttl: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| Error::StorageFailed(format!("presign config: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| Error::StorageFailed(format!("presign {key}: {e}")))?;

        Ok(request.uri().to_string())
    }

    fn object_key(&self, url: &str) -> Option<String> {
        path_style_key(&self.bucket, url)
    }
}

fn path_style_key(bucket: &str, url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let path = parsed.path().trim_start_matches('/');
    path.strip_prefix(&format!("{bucket}/"))
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_strips_endpoint_and_bucket() {
        assert_eq!(
            path_style_key(
                "resumes-bucket",
                "https://s3.local:9000/resumes-bucket/resumes/17_cv.pdf"
            ),
            Some("resumes/17_cv.pdf".to_string())
        );
        assert_eq!(
            path_style_key("resumes-bucket", "https://s3.local/other/17.pdf"),
            None
        );
        assert_eq!(path_style_key("resumes-bucket", "not a url"), None);
    }
}
