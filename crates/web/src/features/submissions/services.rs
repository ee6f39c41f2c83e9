use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::{question::CreateQuestionRequest, submission::SubmissionStatusResponse},
    models::{Question, SubmissionRecord},
    repository::question::QuestionRepository,
    services::{
        submission_guard::{Admission, SubmissionGuard},
        validation::validate_question,
    },
};
use validator::Validate;

use crate::error::{ApiResult, WebError};

const DUPLICATE_MESSAGE: &str =
    "This question looks very similar to one you already submitted.";

/// Runs the spam heuristics, then admits the submission against the
/// client's limits. An admitted submission is already in the history.
pub fn screen_submission(
    guard: &SubmissionGuard,
    content: &str,
    now: DateTime<Utc>,
) -> ApiResult<SubmissionRecord> {
    validate_question(content).map_err(|issue| WebError::BadRequest(issue.to_string()))?;

    match guard.admit(content, now) {
        Admission::Admitted(record) => Ok(record),
        Admission::Limited(check) => {
            tracing::info!(client = %guard.key(), "Submission denied by rate limit");
            Err(WebError::TooManyRequests {
                reason: check.reason.unwrap_or_default(),
                retry_after: check.time_until_next,
            })
        }
        Admission::Duplicate => {
            tracing::info!(client = %guard.key(), "Submission rejected as duplicate");
            Err(WebError::Conflict(DUPLICATE_MESSAGE.to_string()))
        }
    }
}

/// Validate, screen and store a question. The history entry taken by the
/// screen is given back when the insert fails.
pub async fn submit_question(
    pool: &PgPool,
    guard: &SubmissionGuard,
    req: &CreateQuestionRequest,
    now: DateTime<Utc>,
) -> ApiResult<Question> {
    req.validate()?;
    let record = screen_submission(guard, &req.content, now)?;

    let repo = QuestionRepository::new(pool);
    let question = match repo.create(req).await {
        Ok(question) => question,
        Err(e) => {
            guard.withdraw(&record);
            return Err(e.into());
        }
    };

    tracing::info!(question_id = %question.id, company = %question.company, "Question submitted");

    Ok(question)
}

pub fn submission_status(guard: &SubmissionGuard, now: DateTime<Utc>) -> SubmissionStatusResponse {
    SubmissionStatusResponse {
        limits: guard.check_limits(now),
        contributor: guard.contributor_type(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use storage::{dto::submission::ContributorType, kv::MemoryStore};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 2, 8, 30, 0).unwrap()
    }

    fn guard() -> SubmissionGuard {
        SubmissionGuard::scoped(Arc::new(MemoryStore::new()), "client-1")
    }

    #[test]
    fn test_accepts_fresh_valid_question() {
        let guard = guard();
        let record = screen_submission(&guard, "How do you reverse a linked list?", now()).unwrap();
        assert_eq!(record.normalized_content, "how do you reverse a linked list?");
        assert_eq!(guard.history().unwrap(), vec![record]);
    }

    #[test]
    fn test_parallel_screens_respect_daily_cap() {
        let guard = guard();
        let questions = [
            "How do you reverse a linked list?",
            "Explain the CAP theorem in detail",
            "How does a B-tree index work?",
            "What happens when you type a URL?",
            "Design a rate limiter for an API",
        ];

        let admitted = std::thread::scope(|scope| {
            let handles: Vec<_> = questions
                .iter()
                .enumerate()
                .map(|(i, question)| {
                    let guard = &guard;
                    scope.spawn(move || {
                        screen_submission(guard, question, now() + Duration::minutes(2 * i as i64))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert!(admitted <= 3, "admitted {admitted}");
        assert_eq!(guard.history().unwrap().len(), admitted);
    }

    #[test]
    fn test_rejects_spam_before_touching_limits() {
        let result = screen_submission(&guard(), "hi there", now());
        assert!(matches!(result, Err(WebError::BadRequest(_))));
    }

    #[test]
    fn test_cooldown_maps_to_too_many_requests() {
        let guard = guard();
        guard.record_submission("Explain the CAP theorem in detail", now());

        let result = screen_submission(
            &guard,
            "How does a B-tree index work?",
            now() + Duration::seconds(20),
        );
        match result {
            Err(WebError::TooManyRequests { reason, retry_after }) => {
                assert_eq!(retry_after, Some(40));
                assert_eq!(reason, "Please wait 40 seconds between submissions.");
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let guard = guard();
        guard.record_submission("how do you reverse a linked list", now());

        let result = screen_submission(
            &guard,
            "How do you reverse a linked list?",
            now() + Duration::minutes(5),
        );
        assert!(matches!(result, Err(WebError::Conflict(_))));
    }

    #[test]
    fn test_status_reports_limits_and_contributor() {
        let guard = guard();
        let status = submission_status(&guard, now());
        assert!(status.limits.can_submit);
        assert_eq!(status.contributor, ContributorType::New);

        guard.record_submission("Explain the CAP theorem in detail", now());
        let status = submission_status(&guard, now() + Duration::seconds(1));
        assert!(!status.limits.can_submit);
    }
}
