use std::fmt;

use crate::booking::{DateSource, FetchOutcome};
use crate::detector::{self, ChangeResult};
use crate::error::WatchResult;
use crate::notify::Notifier;
use crate::snapshot::SnapshotStore;

/// Result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Notified,
    NothingNew,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Notified => write!(f, "Dates found, notification sent"),
            RunOutcome::NothingNew => write!(f, "Dates not found, notification not sent"),
        }
    }
}

/// One pass of the pipeline: fetch, compare with the snapshot, notify.
pub async fn run_once(
    source: &dyn DateSource,
    store: &SnapshotStore,
    notifier: &Notifier,
) -> WatchResult<RunOutcome> {
    let current = match source.fetch_dates().await? {
        FetchOutcome::Dates(dates) => dates,
        FetchOutcome::Rejected => return Ok(RunOutcome::NothingNew),
    };

    tracing::info!("Fetched {} available dates", current.len());

    let previous = store.read().await.inspect_err(|e| {
        tracing::error!("Cannot read previous dates: {:?}", e);
    })?;

    match detector::evaluate(&current, &previous, store).await? {
        ChangeResult::Notify(dates) => {
            tracing::info!("Reporting dates: {:?}", dates);
            notifier.notify(&dates).await?;
            Ok(RunOutcome::Notified)
        }
        ChangeResult::NoNotification => Ok(RunOutcome::NothingNew),
    }
}
