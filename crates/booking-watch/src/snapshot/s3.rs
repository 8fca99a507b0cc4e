use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::SnapshotBackend;

/// Snapshot kept as a single S3 object
pub struct S3Backend {
    client: Client,
    bucket: String,
    key: Option<String>,
}

impl S3Backend {
    pub fn new(client: Client, bucket: String, key: Option<String>) -> Self {
        Self {
            client,
            bucket,
            key,
        }
    }

    /// Build a client from the standard AWS provider chain (env, profile, instance role).
    pub async fn from_env(bucket: String, key: Option<String>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&sdk_config), bucket, key)
    }

    fn key(&self) -> Result<&str> {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => anyhow::bail!("S3 key not set!"),
        }
    }
}

#[async_trait]
impl SnapshotBackend for S3Backend {
    fn describe(&self) -> String {
        format!(
            "s3 object s3://{}/{}",
            self.bucket,
            self.key.as_deref().unwrap_or_default()
        )
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        let key = self.key()?;

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to get S3 object"),
        };

        let body = output
            .body
            .collect()
            .await
            .context("Failed to read S3 object body")?;

        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn store(&self, bytes: Vec<u8>) -> Result<()> {
        let key = self.key()?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .context("Failed to put S3 object")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotStore;

    fn offline_client() -> Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("eu-central-1"))
            .build();
        Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_missing_key_reads_empty_without_request() {
        let backend = S3Backend::new(offline_client(), "booking-dates".to_string(), None);
        assert!(backend.load().await.is_err());

        let store = SnapshotStore::with_backend(backend);
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_write_is_swallowed() {
        let backend = S3Backend::new(
            offline_client(),
            "booking-dates".to_string(),
            Some(String::new()),
        );
        let store = SnapshotStore::with_backend(backend);
        assert!(store.write(&["2024-01-01".to_string()]).await.is_ok());
    }

    #[test]
    fn test_describe_names_object() {
        let backend = S3Backend::new(
            offline_client(),
            "booking-dates".to_string(),
            Some("prod/dates.json".to_string()),
        );
        assert_eq!(
            backend.describe(),
            "s3 object s3://booking-dates/prod/dates.json"
        );
    }
}
