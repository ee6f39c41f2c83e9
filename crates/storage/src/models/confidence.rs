use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Question;

/// How much a reader can trust a submitted question, derived from its
/// provenance and how completely it was annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn for_question(question: &Question) -> Self {
        let mut score = match question.source.as_deref() {
            Some("direct") => 3,
            Some("other") => 1,
            _ => 0,
        };

        let fields = [
            Some(question.company.as_str()),
            question.skill.as_deref(),
            question.experience_level.as_deref(),
            Some(question.round.as_str()),
            question.category.as_deref(),
        ];
        score += fields
            .into_iter()
            .filter(|field| matches!(field, Some(value) if !value.is_empty()))
            .count();

        Self::from_score(score)
    }

    fn from_score(score: usize) -> Self {
        match score {
            s if s >= 6 => Self::High,
            s if s >= 4 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Confidence",
            Self::Medium => "Medium Confidence",
            Self::Low => "Low Confidence",
        }
    }
}
