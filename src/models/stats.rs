//! Per-user task statistics used by the notifier jobs.
//!
//! These are computed fresh on every run from the user's current task
//! documents; nothing is cached between invocations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Task;

/// Snapshot of a user's task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    /// Pending tasks with a due date in the past
    pub overdue: u32,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            if task.is_done {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        stats
    }
}

/// Trailing-seven-day completion figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub completed_this_week: u32,
    pub created_this_week: u32,
    /// round(100 * completed / created), 0 when nothing was created
    pub productivity_rate: u32,
}

impl WeeklyStats {
    pub fn new(completed_this_week: u32, created_this_week: u32) -> Self {
        let productivity_rate = if created_this_week > 0 {
            (f64::from(completed_this_week) / f64::from(created_this_week) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            completed_this_week,
            created_this_week,
            productivity_rate,
        }
    }

    pub fn tier(&self) -> ProductivityTier {
        match self.productivity_rate {
            80.. => ProductivityTier::Celebratory,
            50.. => ProductivityTier::Encouraging,
            _ => ProductivityTier::Motivational,
        }
    }
}

/// Message tone chosen for the weekly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductivityTier {
    /// 80% and above
    Celebratory,
    /// 50% to 79%
    Encouraging,
    Motivational,
}
