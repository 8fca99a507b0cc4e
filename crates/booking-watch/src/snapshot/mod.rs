//! Persisted snapshot of the last observed booking dates.
//!
//! The snapshot is a JSON array of date strings held by exactly one backend: an S3 object when
//! a bucket is configured, otherwise a local file. [`SnapshotStore`] hides which one is in use
//! and absorbs every backend failure: reads degrade to an empty list and writes are logged and
//! dropped. The only error it reports is that no backend is configured at all.

mod file;
mod s3;

pub use file::FileBackend;
pub use s3::S3Backend;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::config::Settings;
use crate::error::{WatchError, WatchResult};

/// Raw byte storage behind the snapshot
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    /// Human readable location, used in log lines
    fn describe(&self) -> String;

    /// Load the stored bytes, `None` when nothing has been stored yet
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes
    async fn store(&self, bytes: Vec<u8>) -> Result<()>;
}

pub struct SnapshotStore {
    backend: Option<Box<dyn SnapshotBackend>>,
}

impl SnapshotStore {
    /// Select the backend from settings: S3 first, then a local file.
    ///
    /// Having neither is not an error here; it is reported on first use so that a run that
    /// never reaches the store does not fail.
    pub async fn from_settings(settings: &Settings) -> Self {
        if settings.is_s3() {
            let bucket = settings.s3_bucket.clone().unwrap_or_default();
            let backend = S3Backend::from_env(bucket, settings.s3_key.clone()).await;
            Self::with_backend(backend)
        } else if settings.is_file() {
            let path = settings.dates_filename.clone().unwrap_or_default();
            Self::with_backend(FileBackend::new(path))
        } else {
            Self::unconfigured()
        }
    }

    pub fn with_backend(backend: impl SnapshotBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> WatchResult<&dyn SnapshotBackend> {
        self.backend
            .as_deref()
            .ok_or(WatchError::StorageNotConfigured)
    }

    /// Read the previously stored dates.
    ///
    /// Missing, unreadable and malformed snapshots all read as an empty list.
    pub async fn read(&self) -> WatchResult<Vec<String>> {
        let backend = self.backend()?;

        let dates = match backend.load().await {
            Ok(Some(bytes)) => parse_dates(&bytes, &backend.describe()),
            Ok(None) => {
                tracing::info!("No previous dates stored at {}", backend.describe());
                Vec::new()
            }
            Err(e) => {
                tracing::error!(
                    "An error occurred while retrieving previous dates from {}: {:?}",
                    backend.describe(),
                    e
                );
                Vec::new()
            }
        };

        Ok(dates)
    }

    /// Overwrite the snapshot with `dates`, kept in the given order.
    ///
    /// Backend failures are logged and swallowed.
    pub async fn write(&self, dates: &[String]) -> WatchResult<()> {
        let backend = self.backend()?;

        let bytes = match serde_json::to_vec(dates) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to serialize dates {:?}: {:?}", dates, e);
                return Ok(());
            }
        };

        match backend.store(bytes).await {
            Ok(()) => tracing::info!(
                "Updated {} with the following data: {:?}",
                backend.describe(),
                dates
            ),
            Err(e) => tracing::error!(
                "An error occurred while writing dates to {}: {:?}",
                backend.describe(),
                e
            ),
        }

        Ok(())
    }
}

/// Decode stored bytes as a list of date strings, or nothing.
fn parse_dates(bytes: &[u8], location: &str) -> Vec<String> {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to parse previous dates from {}: {:?}", location, e);
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        tracing::warn!("Previous dates in {} are not a list, ignoring them", location);
        return Vec::new();
    };

    let dates: Option<Vec<String>> = items
        .into_iter()
        .map(|item| match item {
            Value::String(date) => Some(date),
            _ => None,
        })
        .collect();

    dates.unwrap_or_else(|| {
        tracing::warn!("Previous dates in {} contain non-string entries, ignoring them", location);
        Vec::new()
    })
}
