// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Retention cleanup for the `activities` collection.
//!
//! Expired activities are deleted in pages of at most
//! [`CLEANUP_BATCH_SIZE`], each page in one atomic commit. Pages are not
//! atomic with each other; a run that dies halfway leaves the remaining
//! rows for the next run, which is safe because deletion is idempotent.

use crate::config::{CLEANUP_BATCH_SIZE, DEFAULT_RETENTION_DAYS};
use crate::db::{ActivityRange, TaskStore};
use crate::error::Result;
use crate::models::{CleanupStats, ManualCleanupResult};
use crate::time_utils::{days_before, format_utc_iso};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a scheduled cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub deleted: u64,
    pub cutoff_date: String,
}

/// Cutoff string for a retention window ending at `now`.
pub fn retention_cutoff(now: DateTime<Utc>, retention_days: u32) -> String {
    format_utc_iso(days_before(now, retention_days))
}

/// Delete activities with `timestamp < cutoff`, at most `max_delete` of
/// them when a cap is given.
///
/// Returns the number of documents deleted.
pub async fn purge_before(
    store: &dyn TaskStore,
    cutoff: &str,
    max_delete: Option<u64>,
) -> Result<u64> {
    let mut total_deleted = 0u64;

    loop {
        let page_size = match max_delete {
            Some(cap) => cap
                .saturating_sub(total_deleted)
                .min(u64::from(CLEANUP_BATCH_SIZE)) as u32,
            None => CLEANUP_BATCH_SIZE,
        };
        if page_size == 0 {
            break;
        }

        let page = store.find_activities_before(cutoff, page_size).await?;
        if page.is_empty() {
            break;
        }

        let ids: Vec<String> = page.into_iter().map(|a| a.id).collect();
        store.delete_activities(&ids).await?;

        let fetched = ids.len() as u64;
        total_deleted += fetched;
        tracing::debug!(batch = fetched, total_deleted, "Deleted expired activity page");

        if fetched < u64::from(page_size) {
            break;
        }
    }

    Ok(total_deleted)
}

/// Scheduled cleanup: default retention, no cap beyond the page size.
pub async fn cleanup_old_activities(
    store: &dyn TaskStore,
    now: DateTime<Utc>,
) -> Result<CleanupReport> {
    let cutoff_date = retention_cutoff(now, DEFAULT_RETENTION_DAYS);
    tracing::info!(cutoff = %cutoff_date, "Starting activity retention cleanup");

    let deleted = purge_before(store, &cutoff_date, None).await?;

    tracing::info!(deleted, cutoff = %cutoff_date, "Deleted old activities");
    Ok(CleanupReport {
        deleted,
        cutoff_date,
    })
}

/// Manual cleanup with a caller-chosen window and cap.
pub async fn manual_cleanup(
    store: &dyn TaskStore,
    retention_days: u32,
    max_delete: u32,
    now: DateTime<Utc>,
) -> Result<ManualCleanupResult> {
    let cutoff = retention_cutoff(now, retention_days);
    tracing::info!(
        retention_days,
        max_delete,
        cutoff = %cutoff,
        "Manual activity cleanup requested"
    );

    let deleted = purge_before(store, &cutoff, Some(u64::from(max_delete))).await?;

    tracing::info!(deleted, "Manual activity cleanup complete");
    Ok(ManualCleanupResult::from_count(deleted))
}

/// Counts of all, expired and retained activities for the default window.
pub async fn cleanup_stats(store: &dyn TaskStore, now: DateTime<Utc>) -> Result<CleanupStats> {
    let retention_days = DEFAULT_RETENTION_DAYS;
    let cutoff_date = retention_cutoff(now, retention_days);

    let old = store
        .count_activities(ActivityRange::Before(&cutoff_date))
        .await?;
    let recent = store
        .count_activities(ActivityRange::AtOrAfter(&cutoff_date))
        .await?;
    let total = store.count_activities(ActivityRange::All).await?;

    Ok(CleanupStats {
        total,
        old,
        recent,
        retention_days,
        cutoff_date,
    })
}
