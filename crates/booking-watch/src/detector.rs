//! Decides whether a freshly fetched date list is worth a notification.
//!
//! Policy:
//! - identical sets: nothing to do, the snapshot is left alone
//! - any difference: the snapshot is overwritten with the fetched list as received
//! - fetched list empty, or only dates removed: no notification
//! - otherwise: notify with `previous - current`
//!
//! The payload direction is `previous - current`, the dates that were known before and are now
//! gone, not the newly added ones. Whether that direction is intended is unconfirmed, so it is
//! kept exactly as the tool has always behaved.

use std::collections::BTreeSet;

use crate::error::WatchResult;
use crate::snapshot::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeResult {
    NoNotification,
    /// Dates to report, sorted
    Notify(BTreeSet<String>),
}

/// Outcome of comparing two date lists, before any side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The snapshot differs from the fetched dates and must be overwritten
    pub changed: bool,
    pub result: ChangeResult,
}

pub fn compare(current: &[String], previous: &[String]) -> Comparison {
    let current_set: BTreeSet<&String> = current.iter().collect();
    let previous_set: BTreeSet<&String> = previous.iter().collect();

    if current_set == previous_set {
        return Comparison {
            changed: false,
            result: ChangeResult::NoNotification,
        };
    }

    // Only fewer dates than before (or none at all) is not news
    let only_removed = current_set.is_subset(&previous_set);
    let result = if current.is_empty() || only_removed {
        ChangeResult::NoNotification
    } else {
        ChangeResult::Notify(
            previous_set
                .difference(&current_set)
                .map(|d| d.to_string())
                .collect(),
        )
    };

    Comparison {
        changed: true,
        result,
    }
}

/// Compare and, when the dates changed, persist `current` to the store.
pub async fn evaluate(
    current: &[String],
    previous: &[String],
    store: &SnapshotStore,
) -> WatchResult<ChangeResult> {
    let comparison = compare(current, previous);

    if comparison.changed {
        store.write(current).await?;
    } else {
        tracing::debug!("Booking dates unchanged ({} dates)", current.len());
    }

    Ok(comparison.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::tests::MemoryBackend;

    fn dates(items: &[&str]) -> Vec<String> {
        items.iter().map(|d| d.to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_equal_sets_do_nothing() {
        let comparison = compare(
            &dates(&["2024-01-02", "2024-01-01"]),
            &dates(&["2024-01-01", "2024-01-02", "2024-01-01"]),
        );
        assert!(!comparison.changed);
        assert_eq!(comparison.result, ChangeResult::NoNotification);
    }

    #[test]
    fn test_both_empty_do_nothing() {
        let comparison = compare(&[], &[]);
        assert!(!comparison.changed);
        assert_eq!(comparison.result, ChangeResult::NoNotification);
    }

    #[test]
    fn test_proper_subset_is_not_news() {
        let comparison = compare(
            &dates(&["2024-01-01"]),
            &dates(&["2024-01-01", "2024-01-02"]),
        );
        assert!(comparison.changed);
        assert_eq!(comparison.result, ChangeResult::NoNotification);
    }

    #[test]
    fn test_empty_current_never_notifies() {
        let comparison = compare(&[], &dates(&["2024-01-01"]));
        assert!(comparison.changed);
        assert_eq!(comparison.result, ChangeResult::NoNotification);
    }

    #[test]
    fn test_payload_is_previous_minus_current() {
        let comparison = compare(
            &dates(&["2024-01-03"]),
            &dates(&["2024-01-01", "2024-01-02"]),
        );
        assert!(comparison.changed);
        assert_eq!(
            comparison.result,
            ChangeResult::Notify(set(&["2024-01-01", "2024-01-02"]))
        );
    }

    #[test]
    fn test_overlapping_sets_report_dropped_dates_only() {
        let comparison = compare(
            &dates(&["2024-01-02", "2024-01-03"]),
            &dates(&["2024-01-01", "2024-01-02"]),
        );
        assert_eq!(comparison.result, ChangeResult::Notify(set(&["2024-01-01"])));
    }

    #[test]
    fn test_superset_of_previous_notifies_with_empty_payload() {
        let comparison = compare(
            &dates(&["2024-01-01", "2024-01-02"]),
            &dates(&["2024-01-01"]),
        );
        assert!(comparison.changed);
        assert_eq!(comparison.result, ChangeResult::Notify(BTreeSet::new()));

        let first_run = compare(&dates(&["2024-01-01"]), &[]);
        assert_eq!(first_run.result, ChangeResult::Notify(BTreeSet::new()));
    }

    #[tokio::test]
    async fn test_evaluate_writes_received_list_on_change() {
        let backend = MemoryBackend::default();
        let store = SnapshotStore::with_backend(backend.clone());

        let result = evaluate(
            &dates(&["2024-01-03"]),
            &dates(&["2024-01-01", "2024-01-02"]),
            &store,
        )
        .await
        .unwrap();

        assert_eq!(result, ChangeResult::Notify(set(&["2024-01-01", "2024-01-02"])));
        assert_eq!(backend.stored().as_deref(), Some(r#"["2024-01-03"]"#));
    }

    #[tokio::test]
    async fn test_evaluate_writes_empty_list() {
        let backend = MemoryBackend::default();
        let store = SnapshotStore::with_backend(backend.clone());

        let result = evaluate(&[], &dates(&["2024-01-01"]), &store).await.unwrap();

        assert_eq!(result, ChangeResult::NoNotification);
        assert_eq!(backend.stored().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_evaluate_writes_shrunk_list() {
        let backend = MemoryBackend::default();
        let store = SnapshotStore::with_backend(backend.clone());

        let result = evaluate(
            &dates(&["2024-01-02"]),
            &dates(&["2024-01-01", "2024-01-02"]),
            &store,
        )
        .await
        .unwrap();

        assert_eq!(result, ChangeResult::NoNotification);
        assert_eq!(backend.stored().as_deref(), Some(r#"["2024-01-02"]"#));
    }

    #[tokio::test]
    async fn test_evaluate_skips_write_when_unchanged() {
        let backend = MemoryBackend::default();
        let store = SnapshotStore::with_backend(backend.clone());

        let result = evaluate(&[], &[], &store).await.unwrap();

        assert_eq!(result, ChangeResult::NoNotification);
        assert_eq!(backend.write_count(), 0);
    }
}
