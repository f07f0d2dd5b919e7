// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity log record, the target of retention cleanup.

use serde::{Deserialize, Serialize};

/// Activity record in Firestore.
///
/// Only the fields cleanup needs are modelled; other fields written by the
/// client are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Document ID
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// When the activity happened (ISO 8601, compared lexically)
    pub timestamp: String,
}
