use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of the submission rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionCheck {
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Seconds until the cooldown expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_until_next: Option<u64>,
}

impl SubmissionCheck {
    pub fn allowed() -> Self {
        Self {
            can_submit: true,
            reason: None,
            time_until_next: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            can_submit: false,
            reason: Some(reason.into()),
            time_until_next: None,
        }
    }

    pub fn cooldown(reason: impl Into<String>, seconds: u64) -> Self {
        Self {
            can_submit: false,
            reason: Some(reason.into()),
            time_until_next: Some(seconds),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContributorType {
    Trusted,
    New,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionStatusResponse {
    #[serde(flatten)]
    pub limits: SubmissionCheck,
    pub contributor: ContributorType,
}
