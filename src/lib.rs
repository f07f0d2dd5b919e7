// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PlanMate Functions: backend automation for the PlanMate task app
//!
//! This crate runs the scheduled jobs (activity retention cleanup,
//! inactivity, weekly and daily notifications), the task-write achievement
//! triggers, and the small set of callable endpoints used by the app.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::TaskStore;
use services::{Notifier, PushDispatcher};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn TaskStore>,
        push: Arc<dyn PushDispatcher>,
    ) -> Self {
        Self {
            config,
            notifier: Notifier::new(store, push),
        }
    }
}
