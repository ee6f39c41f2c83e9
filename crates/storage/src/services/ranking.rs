//! Display ordering for question lists.
//!
//! A question's score is its freshness (exponential decay over a 30-day
//! constant) scaled by a small bonus for each optional metadata field the
//! submitter filled in:
//!
//! ```text
//! score = e^(-days_old / 30) * min(1.0 + 0.05 * filled_fields, 1.15)
//! ```

use chrono::{DateTime, Utc};

const DECAY_DAYS: f64 = 30.0;
const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const FIELD_BONUS: f64 = 0.05;
const MAX_QUALITY_MULTIPLIER: f64 = 1.15;

/// Anything that can be placed in the ranked feed.
pub trait Rankable {
    fn created_at(&self) -> DateTime<Utc>;
    fn skill(&self) -> Option<&str>;
    fn category(&self) -> Option<&str>;
    fn experience_level(&self) -> Option<&str>;
}

/// Recency weight in `[0, 1]`. Timestamps in the future count as brand new.
pub fn freshness_score(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days_old = (now - created_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
    let decay = (-days_old.max(0.0) / DECAY_DAYS).exp();

    if decay.is_finite() { decay.max(0.0) } else { 0.0 }
}

/// Multiplier in `[1.0, 1.15]` rewarding filled-in skill, category and
/// experience level. Blank strings do not count.
pub fn quality_multiplier<T: Rankable + ?Sized>(record: &T) -> f64 {
    let filled = [record.skill(), record.category(), record.experience_level()]
        .into_iter()
        .filter(|field| matches!(field, Some(value) if !value.trim().is_empty()))
        .count();

    (1.0 + FIELD_BONUS * filled as f64).min(MAX_QUALITY_MULTIPLIER)
}

pub fn ranking_score<T: Rankable + ?Sized>(record: &T, now: DateTime<Utc>) -> f64 {
    freshness_score(record.created_at(), now) * quality_multiplier(record)
}

/// Orders records by descending score. Records with equal scores keep
/// their input order.
pub fn sort_by_rank<T: Rankable>(records: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
    rank_with_scores(records, now)
        .into_iter()
        .map(|(record, _)| record)
        .collect()
}

/// Same ordering as [`sort_by_rank`], keeping the computed score alongside
/// each record.
pub fn rank_with_scores<T: Rankable>(records: Vec<T>, now: DateTime<Utc>) -> Vec<(T, f64)> {
    let mut scored: Vec<(T, f64)> = records
        .into_iter()
        .map(|record| {
            let score = ranking_score(&record, now);
            (record, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    use super::*;

    #[derive(Debug, Clone)]
    struct Entry {
        name: &'static str,
        created_at: DateTime<Utc>,
        skill: Option<&'static str>,
        category: Option<&'static str>,
        experience_level: Option<&'static str>,
    }

    impl Entry {
        fn new(name: &'static str, created_at: DateTime<Utc>) -> Self {
            Self {
                name,
                created_at,
                skill: None,
                category: None,
                experience_level: None,
            }
        }
    }

    impl Rankable for Entry {
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn skill(&self) -> Option<&str> {
            self.skill
        }

        fn category(&self) -> Option<&str> {
            self.category
        }

        fn experience_level(&self) -> Option<&str> {
            self.experience_level
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_freshness_is_one_for_new_records() {
        assert_relative_eq!(freshness_score(now(), now()), 1.0);
    }

    #[test]
    fn test_freshness_after_thirty_days() {
        let created = now() - Duration::days(30);
        assert_relative_eq!(freshness_score(created, now()), (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_freshness_strictly_decreases_with_age() {
        let mut previous = freshness_score(now(), now());
        for days in [1, 2, 7, 30, 90, 365, 3650] {
            let score = freshness_score(now() - Duration::days(days), now());
            assert!(score < previous, "score at {days} days should drop");
            assert!((0.0..=1.0).contains(&score));
            previous = score;
        }
    }

    #[test]
    fn test_future_timestamps_are_capped_at_one() {
        let created = now() + Duration::days(3);
        assert_relative_eq!(freshness_score(created, now()), 1.0);
    }

    #[test]
    fn test_quality_multiplier_counts_filled_fields() {
        let mut entry = Entry::new("q", now());
        assert_relative_eq!(quality_multiplier(&entry), 1.0);

        entry.skill = Some("Rust");
        assert_relative_eq!(quality_multiplier(&entry), 1.05);

        entry.category = Some("Ownership");
        assert_relative_eq!(quality_multiplier(&entry), 1.10, epsilon = 1e-12);

        entry.experience_level = Some("3-4 years");
        let full = quality_multiplier(&entry);
        assert_relative_eq!(full, 1.15, epsilon = 1e-12);
        assert!(full <= 1.15);
    }

    #[test]
    fn test_blank_fields_do_not_count() {
        let mut entry = Entry::new("q", now());
        entry.skill = Some("   ");
        entry.category = Some("");
        assert_relative_eq!(quality_multiplier(&entry), 1.0);
    }

    #[test]
    fn test_ranking_score_combines_both_factors() {
        let mut entry = Entry::new("q", now() - Duration::days(15));
        entry.skill = Some("Go");
        let expected = (-0.5f64).exp() * 1.05;
        assert_relative_eq!(ranking_score(&entry, now()), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sort_orders_by_descending_score() {
        let old = Entry::new("old", now() - Duration::days(60));
        let fresh = Entry::new("fresh", now() - Duration::hours(1));
        let mut annotated = Entry::new("annotated", now() - Duration::days(1));
        annotated.skill = Some("SQL");
        annotated.category = Some("Joins");

        let ranked = sort_by_rank(vec![old, annotated, fresh], now());
        let names: Vec<&str> = ranked.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["annotated", "fresh", "old"]);

        let scores: Vec<f64> = ranked.iter().map(|e| ranking_score(e, now())).collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let created = now() - Duration::days(2);
        let entries = vec![
            Entry::new("first", created),
            Entry::new("second", created),
            Entry::new("third", created),
        ];

        let ranked = sort_by_rank(entries, now());
        let names: Vec<&str> = ranked.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_with_scores_reports_scores() {
        let entries = vec![
            Entry::new("older", now() - Duration::days(10)),
            Entry::new("newer", now()),
        ];

        let ranked = rank_with_scores(entries, now());
        assert_eq!(ranked[0].0.name, "newer");
        assert_relative_eq!(ranked[0].1, 1.0);
        assert!(ranked[1].1 < ranked[0].1);
    }

    #[test]
    fn test_empty_input() {
        let ranked: Vec<Entry> = sort_by_rank(Vec::new(), now());
        assert!(ranked.is_empty());
    }
}
