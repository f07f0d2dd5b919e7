// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the documents this service reads and writes.

pub mod achievement;
pub mod activity;
pub mod cleanup;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;

pub use achievement::{Achievement, AchievementKind};
pub use activity::Activity;
pub use cleanup::{CleanupStats, ManualCleanupResult};
pub use project::Project;
pub use stats::{ProductivityTier, TaskStats, WeeklyStats};
pub use task::{Task, TaskSnapshot};
pub use user::User;
