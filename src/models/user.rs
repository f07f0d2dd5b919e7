//! User model as stored by the mobile client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore. Read-only for this service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID (Firebase Auth uid)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Last sign-in time reported by the client
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub last_sign_in: Option<DateTime<Utc>>,
    /// FCM registration token of the user's device
    #[serde(default)]
    pub fcm_token: Option<String>,
}

impl User {
    /// The push token, if one is registered and non-empty.
    pub fn push_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|t| !t.is_empty())
    }
}
