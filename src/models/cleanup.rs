// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Results returned by the cleanup callables.

use serde::Serialize;

/// Aggregate activity counts around a retention cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStats {
    pub total: u64,
    /// Activities older than the cutoff
    pub old: u64,
    /// Activities at or after the cutoff
    pub recent: u64,
    pub retention_days: u32,
    /// Cutoff as ISO 8601
    pub cutoff_date: String,
}

/// Result of the manual cleanup callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManualCleanupResult {
    Nothing { success: bool, message: String },
    Deleted { success: bool, deleted: u64 },
}

impl ManualCleanupResult {
    pub fn from_count(deleted: u64) -> Self {
        if deleted == 0 {
            ManualCleanupResult::Nothing {
                success: true,
                message: "No old activities found".to_string(),
            }
        } else {
            ManualCleanupResult::Deleted {
                success: true,
                deleted,
            }
        }
    }

    pub fn deleted(&self) -> u64 {
        match self {
            ManualCleanupResult::Nothing { .. } => 0,
            ManualCleanupResult::Deleted { deleted, .. } => *deleted,
        }
    }
}
