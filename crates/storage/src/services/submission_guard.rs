//! Soft per-client limits on question submissions.
//!
//! The guard keeps the last few submissions of one client in a
//! [`KeyValueStore`] and uses them to enforce a daily cap, a cooldown
//! between submissions and a near-duplicate check. It is advisory: every
//! storage failure is logged and treated as "no history", so the guard
//! fails open and never blocks a submission because of its own errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::dto::submission::{ContributorType, SubmissionCheck};
use crate::error::Result;
use crate::kv::KeyValueStore;
use crate::models::{NormalizedContent, SubmissionRecord};

pub const STORAGE_KEY: &str = "question_submissions";
pub const MAX_SUBMISSIONS_PER_DAY: usize = 3;
pub const MIN_SECONDS_BETWEEN_SUBMISSIONS: i64 = 60;
pub const HISTORY_CAPACITY: usize = 10;
pub const DUPLICATE_THRESHOLD: f64 = 0.7;
const TRUSTED_SUBMISSIONS: usize = 5;
const MIN_SUBSTRING_MATCH_LEN: usize = 4;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_HOUR: i64 = 60 * 60 * MILLIS_PER_SECOND;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

#[derive(Clone)]
pub struct SubmissionGuard {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SubmissionGuard {
    /// Guard over the single history stored under [`STORAGE_KEY`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Guard over one client's private history in a shared store.
    pub fn scoped(store: Arc<dyn KeyValueStore>, client_id: &str) -> Self {
        Self {
            store,
            key: format!("{}:{}", STORAGE_KEY, client_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn check_limits(&self, now: DateTime<Utc>) -> SubmissionCheck {
        match self.load() {
            Ok(history) => evaluate_limits(&history, now.timestamp_millis()),
            Err(e) => {
                tracing::warn!(key = %self.key, "Error checking submission limits: {}", e);
                SubmissionCheck::allowed()
            }
        }
    }

    /// Appends a submission, keeping only the most recent
    /// [`HISTORY_CAPACITY`] entries.
    pub fn record_submission(&self, content: &str, now: DateTime<Utc>) {
        let record = SubmissionRecord::new(now.timestamp_millis(), NormalizedContent::new(content));
        let result = self.modify(|history| {
            push_bounded(history, record.clone());
            true
        });

        if let Err(e) = result {
            tracing::warn!(key = %self.key, "Error recording submission: {}", e);
        }
    }

    /// Checks limits and duplicates and, when both pass, records the
    /// submission in the same store update.
    pub fn admit(&self, content: &str, now: DateTime<Utc>) -> Admission {
        let candidate = NormalizedContent::new(content);
        let record = SubmissionRecord::new(now.timestamp_millis(), candidate.clone());
        let mut admission = Admission::Admitted(record.clone());

        let result = self.modify(|history| {
            let check = evaluate_limits(history, record.timestamp);
            admission = if !check.can_submit {
                Admission::Limited(check)
            } else if is_duplicate(&candidate, history) {
                Admission::Duplicate
            } else {
                push_bounded(history, record.clone());
                Admission::Admitted(record.clone())
            };
            matches!(admission, Admission::Admitted(_))
        });

        match result {
            Ok(()) => admission,
            Err(e) => {
                tracing::warn!(key = %self.key, "Error admitting submission: {}", e);
                Admission::Admitted(record)
            }
        }
    }

    /// Removes a record previously returned by [`SubmissionGuard::admit`],
    /// for submissions that were never stored.
    pub fn withdraw(&self, record: &SubmissionRecord) {
        let result = self.modify(|history| {
            match history.iter().rposition(|entry| entry == record) {
                Some(index) => {
                    history.remove(index);
                    true
                }
                None => false,
            }
        });

        if let Err(e) = result {
            tracing::warn!(key = %self.key, "Error withdrawing submission: {}", e);
        }
    }

    pub fn check_duplicate(&self, content: &str) -> bool {
        match self.load() {
            Ok(history) => is_duplicate(&NormalizedContent::new(content), &history),
            Err(e) => {
                tracing::warn!(key = %self.key, "Error checking duplicate: {}", e);
                false
            }
        }
    }

    pub fn contributor_type(&self) -> ContributorType {
        match self.load() {
            Ok(history) if history.len() >= TRUSTED_SUBMISSIONS => ContributorType::Trusted,
            Ok(_) => ContributorType::New,
            Err(e) => {
                tracing::warn!(key = %self.key, "Error reading submission history: {}", e);
                ContributorType::New
            }
        }
    }

    pub fn history(&self) -> Result<Vec<SubmissionRecord>> {
        self.load()
    }

    fn load(&self) -> Result<Vec<SubmissionRecord>> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Rewrites the history atomically when `f` reports a change.
    fn modify<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Vec<SubmissionRecord>) -> bool,
    {
        self.store.update(&self.key, &mut |raw| {
            let mut history: Vec<SubmissionRecord> = match raw {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };
            if !f(&mut history) {
                return Ok(None);
            }
            Ok(Some(serde_json::to_string(&history)?))
        })
    }
}

/// Result of [`SubmissionGuard::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Allowed and already recorded.
    Admitted(SubmissionRecord),
    Limited(SubmissionCheck),
    Duplicate,
}

fn push_bounded(history: &mut Vec<SubmissionRecord>, record: SubmissionRecord) {
    history.push(record);
    if history.len() > HISTORY_CAPACITY {
        history.drain(..history.len() - HISTORY_CAPACITY);
    }
}

/// Applies the daily cap and then the cooldown to a submission history.
pub fn evaluate_limits(history: &[SubmissionRecord], now_ms: i64) -> SubmissionCheck {
    let window_start = now_ms - MILLIS_PER_DAY;
    let recent: Vec<i64> = history
        .iter()
        .map(|record| record.timestamp)
        .filter(|&timestamp| timestamp > window_start)
        .collect();

    if recent.len() >= MAX_SUBMISSIONS_PER_DAY {
        let oldest = recent.iter().copied().min().unwrap_or(now_ms);
        let hours = ceil_div(oldest + MILLIS_PER_DAY - now_ms, MILLIS_PER_HOUR);
        return SubmissionCheck::denied(format!(
            "You've reached the daily limit of {} submissions. Please try again in {} hour{}.",
            MAX_SUBMISSIONS_PER_DAY,
            hours,
            plural(hours)
        ));
    }

    if let Some(last) = recent.iter().copied().max() {
        let remaining = MIN_SECONDS_BETWEEN_SUBMISSIONS * MILLIS_PER_SECOND - (now_ms - last);
        if remaining > 0 {
            let seconds = ceil_div(remaining, MILLIS_PER_SECOND);
            return SubmissionCheck::cooldown(
                format!(
                    "Please wait {} second{} between submissions.",
                    seconds,
                    plural(seconds)
                ),
                seconds as u64,
            );
        }
    }

    SubmissionCheck::allowed()
}

pub fn is_duplicate(candidate: &NormalizedContent, history: &[SubmissionRecord]) -> bool {
    history
        .iter()
        .any(|record| similarity(candidate, &record.content()) > DUPLICATE_THRESHOLD)
}

/// Share of candidate words found in `stored`, relative to the longer of
/// the two texts.
///
/// Two words match when they are equal, or when one contains the other and
/// the containing word is longer than four characters.
pub fn similarity(candidate: &NormalizedContent, stored: &NormalizedContent) -> f64 {
    let candidate_words: Vec<&str> = candidate.words().collect();
    let stored_words: Vec<&str> = stored.words().collect();

    let total = candidate_words.len().max(stored_words.len());
    if total == 0 {
        return 0.0;
    }

    let matched = candidate_words
        .iter()
        .filter(|word| stored_words.iter().any(|other| words_match(word, other)))
        .count();

    matched as f64 / total as f64
}

fn words_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    longer.chars().count() > MIN_SUBSTRING_MATCH_LEN && longer.contains(shorter)
}

fn ceil_div(value: i64, unit: i64) -> i64 {
    (value + unit - 1).div_euclid(unit)
}

fn plural(count: i64) -> &'static str {
    if count > 1 { "s" } else { "" }
}
