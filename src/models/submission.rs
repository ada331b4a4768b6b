use serde::{Deserialize, Deserializer, Serialize};

/// A completed arrangement ready to be recorded.
///
/// This is also the `/submit` request body. Missing fields deserialize to
/// empty values so the handler can reject them with a proper response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "sortedData", default)]
    pub sorted_data: Vec<SortedEntry>,
}

impl Submission {
    /// Check the fields a recorder needs. Names and versions are compared trimmed.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.version.trim().is_empty()
            && !self.sorted_data.is_empty()
    }
}

/// One occupied slot: its column and the text of the card placed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedEntry {
    #[serde(deserialize_with = "column_number")]
    pub column: usize,
    pub card: String,
}

impl SortedEntry {
    /// The project name part of the card text: everything before the first
    /// `-`, trimmed.
    pub fn project_name(&self) -> &str {
        project_name(&self.card)
    }
}

pub fn project_name(card_text: &str) -> &str {
    card_text
        .split_once('-')
        .map_or(card_text, |(head, _)| head)
        .trim()
}

/// Browsers send slot columns from `data-` attributes, so accept both `3` and `"3"`.
fn column_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Column {
        Number(usize),
        Text(String),
    }

    match Column::deserialize(deserializer)? {
        Column::Number(n) => Ok(n),
        Column::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid column: {:?}", s))),
    }
}

/// A persisted row: one placed card of one submission.
///
/// Field names double as the CSV header: `User,Version,Submission,Column,Project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Submission")]
    pub submission: u32,
    #[serde(rename = "Column")]
    pub column: usize,
    #[serde(rename = "Project")]
    pub project: String,
}

/// Response body for `/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<u32>,
}

impl SubmitResponse {
    pub fn accepted(submission: u32) -> Self {
        Self {
            success: true,
            message: Some("Submission successful".to_string()),
            error: None,
            submission: Some(submission),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            submission: None,
        }
    }
}
