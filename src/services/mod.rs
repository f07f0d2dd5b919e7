// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod achievements;
pub mod cleanup;
pub mod messages;
pub mod notifier;
pub mod push;
pub mod reminders;
pub mod scheduler;

pub use achievements::{TaskWrite, TriggerReport};
pub use cleanup::CleanupReport;
pub use notifier::{Delivery, Notifier};
pub use push::{FcmDispatcher, LogOnlyDispatcher, PushDispatcher, PushError, PushPayload};
pub use reminders::NotifyReport;
pub use scheduler::JobKind;
