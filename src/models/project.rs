//! Project model (display lookups only).

use serde::{Deserialize, Serialize};

/// Fallback label when a project has no title.
pub const DEFAULT_PROJECT_TITLE: &str = "โปรเจค";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Project {
    pub fn display_title(project: Option<&Project>) -> String {
        project
            .and_then(|p| p.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_PROJECT_TITLE)
            .to_string()
    }
}
