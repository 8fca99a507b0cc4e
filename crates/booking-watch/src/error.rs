//! Error taxonomy for a watch run.
//!
//! Only hard failures live here. Snapshot read and write failures are absorbed inside
//! [`crate::snapshot`] and never surface as a `WatchError`, and a rejected API envelope is a
//! normal [`crate::booking::FetchOutcome`], not an error.

use thiserror::Error;

/// Hard failures that abort the run
#[derive(Debug, Error)]
pub enum WatchError {
    /// A setting required by the component that is running was not provided
    #[error("Configuration error: {0} environment variable must be set")]
    MissingSetting(&'static str),

    /// Neither object storage nor a local snapshot file is configured
    #[error("Neither S3 or local filename is set!")]
    StorageNotConfigured,

    /// Transport or decoding failure while querying the booking API
    #[error("An error occurred while making the web requests!")]
    Fetch(#[source] anyhow::Error),

    /// Any failure while building or sending the notification email
    #[error("An error occurred while sending the email!")]
    Notify(#[source] anyhow::Error),
}

impl WatchError {
    /// Create a fetch error from anything convertible into `anyhow::Error`
    pub fn fetch(err: impl Into<anyhow::Error>) -> Self {
        WatchError::Fetch(err.into())
    }

    /// Create a notification error from anything convertible into `anyhow::Error`
    pub fn notify(err: impl Into<anyhow::Error>) -> Self {
        WatchError::Notify(err.into())
    }
}

/// Result type alias for watch operations
pub type WatchResult<T> = Result<T, WatchError>;
