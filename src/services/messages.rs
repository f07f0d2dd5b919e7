// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification templates.
//!
//! The app is Thai-language; titles and bodies are fixed strings with the
//! counts interpolated. The `data` map carries the same figures as strings
//! so the client can route the tap.

use crate::models::{AchievementKind, ProductivityTier, TaskStats, WeeklyStats};
use crate::services::push::PushPayload;
use chrono::{DateTime, Utc};

/// Day counts since last sign-in that trigger an inactivity reminder.
pub const INACTIVITY_THRESHOLDS: [i64; 3] = [3, 7, 14];

/// A same-day completion count with its announcement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyMilestone {
    pub count: u32,
    pub title: &'static str,
    pub body: &'static str,
}

pub const DAILY_MILESTONES: [DailyMilestone; 4] = [
    DailyMilestone {
        count: 1,
        title: "🎯 เริ่มต้นดีแล้ว!",
        body: "ทำงานเสร็จแรกวันนี้!",
    },
    DailyMilestone {
        count: 5,
        title: "🔥 น่าทึ่งมาก!",
        body: "คุณปิดงานครบ 5 งานแล้ว!",
    },
    DailyMilestone {
        count: 10,
        title: "⭐ ซูเปอร์สตาร์!",
        body: "10 งานใน 1 วัน! เจ๋งมาก!",
    },
    DailyMilestone {
        count: 15,
        title: "🚀 ไม่มีใครหยุดคุณได้!",
        body: "15 งาน! คุณคือตำนาน!",
    },
];

/// The milestone whose count equals `completed_today` exactly.
pub fn daily_milestone(completed_today: u32) -> Option<&'static DailyMilestone> {
    DAILY_MILESTONES.iter().find(|m| m.count == completed_today)
}

/// Reminder for a user last seen exactly 3, 7 or 14 days ago.
pub fn inactivity_reminder(days_inactive: i64, pending: u32) -> Option<PushPayload> {
    let (title, body) = match days_inactive {
        3 => (
            "คิดถึงคุณนะ! 🌟",
            format!("คุณมีงานค้าง {} งาน มาทำต่อกันเถอะ!", pending),
        ),
        7 => (
            "เราคิดถึงคุณมาก! 💙",
            format!("ห่างหายกันไปนานแล้ว! คุณมีงานค้าง {} งาน", pending),
        ),
        14 => (
            "มานานเกินไปแล้ว! 🎯",
            format!("2 สัปดาห์แล้ว! งานของคุณรออยู่ ({} งาน)", pending),
        ),
        _ => return None,
    };

    Some(
        PushPayload::new(title, body)
            .with_data("type", "inactive_reminder")
            .with_data("days", days_inactive)
            .with_data("pendingTasks", pending),
    )
}

pub fn weekly_summary(weekly: &WeeklyStats, current: &TaskStats) -> PushPayload {
    let (emoji, message) = match weekly.tier() {
        ProductivityTier::Celebratory => ("🔥", "สัปดาห์นี้คุณเจ๋งมาก!"),
        ProductivityTier::Encouraging => ("💪", "ทำได้ดีมาก! ต่อไปทำได้ดีกว่านี้"),
        ProductivityTier::Motivational => ("📈", "สัปดาห์หน้าลองทำให้ดีขึ้นนะ!"),
    };

    PushPayload::new(
        format!("{} สรุปสัปดาห์นี้", emoji),
        format!(
            "{}\n✅ ทำเสร็จ: {} งาน\n📋 คงเหลือ: {} งาน\n📊 Productivity: {}%",
            message, weekly.completed_this_week, current.pending, weekly.productivity_rate
        ),
    )
    .with_data("type", "weekly_summary")
    .with_data("completed", weekly.completed_this_week)
    .with_data("pending", current.pending)
    .with_data("productivity", weekly.productivity_rate)
}

pub fn daily_reminder(stats: &TaskStats) -> PushPayload {
    let (title, body) = if stats.overdue > 0 {
        (
            "⚠️ มีงานเลยกำหนดแล้ว!".to_string(),
            format!(
                "งานเลยกำหนด: {} งาน | งานค้าง: {} งาน",
                stats.overdue, stats.pending
            ),
        )
    } else {
        (
            "📝 เช็คงานวันนี้กันเถอะ!".to_string(),
            format!("คุณมีงานค้าง {} งาน", stats.pending),
        )
    };

    PushPayload::new(title, body)
        .with_data("type", "daily_reminder")
        .with_data("pending", stats.pending)
        .with_data("overdue", stats.overdue)
}

pub fn daily_achievement(milestone: &DailyMilestone) -> PushPayload {
    PushPayload::new(milestone.title, milestone.body)
        .with_data("type", "achievement")
        .with_data(
            "achievementType",
            AchievementKind::DailyCompletion.as_str(),
        )
        .with_data("count", milestone.count)
}

pub fn project_achievement(project_id: &str, project_title: &str, task_count: u32) -> PushPayload {
    PushPayload::new(
        "🎉 เสร็จสมบูรณ์!",
        format!(
            "คุณทำโปรเจค \"{}\" เสร็จแล้ว! ({} งาน)",
            project_title, task_count
        ),
    )
    .with_data("type", "achievement")
    .with_data(
        "achievementType",
        AchievementKind::ProjectCompletion.as_str(),
    )
    .with_data("projectId", project_id)
    .with_data("taskCount", task_count)
}

pub const TEST_NOTIFICATION_TITLE: &str = "🔔 ทดสอบการแจ้งเตือน";
pub const TEST_NOTIFICATION_BODY: &str = "นี่คือการแจ้งเตือนทดสอบ";

pub fn test_notification(
    title: Option<&str>,
    body: Option<&str>,
    now: DateTime<Utc>,
) -> PushPayload {
    let title = title.filter(|t| !t.is_empty()).unwrap_or(TEST_NOTIFICATION_TITLE);
    let body = body.filter(|b| !b.is_empty()).unwrap_or(TEST_NOTIFICATION_BODY);

    PushPayload::new(title, body)
        .with_data("type", "test")
        .with_data("timestamp", crate::time_utils::format_utc_iso(now))
}
