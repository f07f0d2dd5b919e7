// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets as environment variables through secret
//! bindings, so everything is read from the process environment once at
//! startup.

use chrono_tz::Tz;
use std::env;

/// Days an activity record is kept before the cleanup job removes it.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Firestore caps a single commit at 500 writes.
pub const CLEANUP_BATCH_SIZE: u32 = 500;

/// Default per-invocation cap of the manual cleanup callable.
pub const DEFAULT_MAX_DELETE: u32 = 100;

/// Page size used when iterating the `users` collection.
pub const USER_PAGE_SIZE: u32 = 200;

/// Which document store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// In-process store for local development; nothing is persisted.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore and FCM)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// HS256 key used to verify callable bearer tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Secret path segment guarding trigger and job routes
    pub trigger_path_uuid: String,
    /// Zone used for cron schedules and for "today"
    pub timezone: Tz,
    /// Service-account key for FCM; `None` selects the log-only dispatcher
    pub firebase_key_path: Option<String>,
    pub store_backend: StoreBackend,
    /// Run the in-process cron scheduler
    pub enable_scheduler: bool,
}

impl Config {
    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            trigger_path_uuid: "test-trigger-uuid".to_string(),
            timezone: chrono_tz::Asia::Bangkok,
            firebase_key_path: None,
            store_backend: StoreBackend::Memory,
            enable_scheduler: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timezone = match env::var("SCHEDULE_TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid("SCHEDULE_TIMEZONE", name))?,
            Err(_) => chrono_tz::Asia::Bangkok,
        };

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .trim()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            trigger_path_uuid: env::var("TRIGGER_PATH_UUID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TRIGGER_PATH_UUID"))?,
            timezone,
            firebase_key_path: env::var("FIREBASE_KEY_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            store_backend,
            enable_scheduler: env::var("ENABLE_SCHEDULER")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
