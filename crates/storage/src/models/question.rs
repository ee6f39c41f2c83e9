use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::ranking::Rankable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: Uuid,
    pub content: String,
    pub company: String,
    pub skill: Option<String>,
    pub category: Option<String>,
    pub interview_date: NaiveDate,
    pub experience_level: Option<String>,
    pub round: String,
    pub source: Option<String>,
    pub is_flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rankable for Question {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn skill(&self) -> Option<&str> {
        self.skill.as_deref()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn experience_level(&self) -> Option<&str> {
        self.experience_level.as_deref()
    }
}

/// Splits question content into the individual questions it contains.
///
/// Multi-line content yields one entry per non-blank line with any leading
/// `"<n>."` numbering removed. Single-line content is returned trimmed.
pub fn format_questions(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() > 1 {
        return lines
            .into_iter()
            .map(|line| strip_numbering(line.trim()).to_string())
            .collect();
    }

    vec![content.trim().to_string()]
}

fn strip_numbering(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }

    match line[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
