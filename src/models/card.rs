use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A project to be placed into the pyramid.
///
/// `id` is the project name, unique within a team and version. `text` is the
/// summary shown on the card and `details` carries every non-empty cell of the
/// source row keyed by its column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Look up a detail attribute as text.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}

/// A version name as listed for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
}

/// Compact card description used by the `/qsort-data` overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub project_name: String,
    pub mw: Option<String>,
    #[serde(rename = "subRTO")]
    pub sub_rto: Option<String>,
    pub ntp: Option<String>,
}

// ============================================================
// Response bodies
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsResponse {
    pub versions: Vec<VersionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsResponse {
    pub cards: Vec<Card>,
}

/// Every version from the Versions sheet and every card grouped by version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QsortOverview {
    pub versions: Vec<String>,
    pub cards: BTreeMap<String, Vec<CardSummary>>,
}

/// Error body for the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
