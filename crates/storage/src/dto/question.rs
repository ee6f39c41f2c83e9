use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{ConfidenceLevel, Question, format_questions};

pub const EXPERIENCE_LEVELS: &[&str] = &["0-2 years", "3-4 years", "4-6 years", "6-8 years", "8+ years"];
pub const ROUNDS: &[&str] = &["phone", "onsite", "technical", "behavioral", "system_design", "other"];
pub const SOURCES: &[&str] = &["direct", "other"];
pub const DEFAULT_ROUND: &str = "other";

/// Request payload for submitting a new question
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Question must be between 10 and 1000 characters"
    ))]
    pub content: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Company name must be between 1 and 100 characters"
    ))]
    pub company: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Technology must be between 1 and 100 characters"
    ))]
    pub skill: String,

    #[validate(length(max = 100, message = "Category must be less than 100 characters"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_not_future"))]
    pub interview_date: NaiveDate,

    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: Option<String>,

    #[validate(custom(function = "validate_round"))]
    pub round: Option<String>,

    #[validate(custom(function = "validate_source"))]
    pub source: Option<String>,
}

fn validate_not_future(date: &NaiveDate) -> Result<(), validator::ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut error = validator::ValidationError::new("future_date");
        error.message = Some("Interview date cannot be in the future".into());
        return Err(error);
    }
    Ok(())
}

fn validate_one_of(
    value: &str,
    allowed: &[&str],
    code: &'static str,
) -> Result<(), validator::ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new(code);
        error.message = Some(format!("Must be one of: {}", allowed.join(", ")).into());
        Err(error)
    }
}

fn validate_experience_level(level: &str) -> Result<(), validator::ValidationError> {
    validate_one_of(level, EXPERIENCE_LEVELS, "invalid_experience_level")
}

fn validate_round(round: &str) -> Result<(), validator::ValidationError> {
    validate_one_of(round, ROUNDS, "invalid_round")
}

fn validate_source(source: &str) -> Result<(), validator::ValidationError> {
    validate_one_of(source, SOURCES, "invalid_source")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum FreshnessWindow {
    #[serde(rename = "Last 7 days")]
    LastWeek,
    #[serde(rename = "Last 30 days")]
    LastMonth,
    #[serde(rename = "Last 90 days")]
    LastQuarter,
    #[serde(rename = "All time")]
    AllTime,
}

impl FreshnessWindow {
    /// Earliest creation time admitted by the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::LastMonth => Some(now - Duration::days(30)),
            Self::LastQuarter => Some(now - Duration::days(90)),
            Self::AllTime => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionFilter {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Matches question text, company, skill and category
    pub search: Option<String>,
    pub company: Option<String>,
    pub skill: Option<String>,
    pub round: Option<String>,
    pub experience_level: Option<String>,
    pub freshness: Option<FreshnessWindow>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl QuestionFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()?;

        if let Some(ref round) = self.round
            && !ROUNDS.contains(&round.as_str())
        {
            return Err(format!("round must be one of: {}", ROUNDS.join(", ")));
        }

        if let Some(ref level) = self.experience_level
            && !EXPERIENCE_LEVELS.contains(&level.as_str())
        {
            return Err(format!(
                "experience_level must be one of: {}",
                EXPERIENCE_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    /// Search term with surrounding whitespace removed, if any remains
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub content: String,
    pub company: String,
    pub skill: Option<String>,
    pub category: Option<String>,
    pub interview_date: NaiveDate,
    pub experience_level: Option<String>,
    pub round: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confidence: ConfidenceLevel,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        let confidence = ConfidenceLevel::for_question(&question);
        Self {
            id: question.id,
            content: question.content,
            company: question.company,
            skill: question.skill,
            category: question.category,
            interview_date: question.interview_date,
            experience_level: question.experience_level,
            round: question.round,
            source: question.source,
            created_at: question.created_at,
            confidence,
        }
    }
}

/// Question entry in the ranked feed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankedQuestion {
    pub rank: i64,
    pub score: f64,
    #[serde(flatten)]
    pub question: QuestionResponse,
}

/// Single question with its content split into individual prompts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionDetailResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub formatted: Vec<String>,
}

impl From<Question> for QuestionDetailResponse {
    fn from(question: Question) -> Self {
        let formatted = format_questions(&question.content);
        Self {
            question: QuestionResponse::from(question),
            formatted,
        }
    }
}

/// Moderation view, including flagged questions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminQuestionResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub is_flagged: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for AdminQuestionResponse {
    fn from(question: Question) -> Self {
        let is_flagged = question.is_flagged;
        let updated_at = question.updated_at;
        Self {
            question: QuestionResponse::from(question),
            is_flagged,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrendingTopic {
    pub name: String,
    pub count: i64,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TopCompany {
    pub name: String,
    pub discussions: i64,
}
