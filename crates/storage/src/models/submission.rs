use serde::{Deserialize, Serialize};

use super::NormalizedContent;

/// A prior successful submission as persisted by the submission guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(alias = "questionContent")]
    pub normalized_content: String,
}

impl SubmissionRecord {
    pub fn new(timestamp: i64, content: NormalizedContent) -> Self {
        Self {
            timestamp,
            normalized_content: content.into_inner(),
        }
    }

    pub fn content(&self) -> NormalizedContent {
        NormalizedContent::from_normalized(self.normalized_content.clone())
    }
}
