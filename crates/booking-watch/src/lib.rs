//! Watches an alteg.io booking calendar for changed availability.
//!
//! A run fetches the currently bookable dates, compares them with the snapshot stored by the
//! previous run (S3 object or local file), and reports through email or a log line when the
//! change is worth it. Scheduling runs is left to the caller.

pub mod booking;
pub mod config;
pub mod detector;
pub mod error;
pub mod notify;
pub mod snapshot;
pub mod telemetry;
pub mod watcher;

pub use booking::{BookingClient, DateSource, FetchOutcome};
pub use config::Settings;
pub use detector::ChangeResult;
pub use error::{WatchError, WatchResult};
pub use notify::Notifier;
pub use snapshot::SnapshotStore;
pub use watcher::{run_once, RunOutcome};
