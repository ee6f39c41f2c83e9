use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::question::{
    CreateQuestionRequest, DEFAULT_ROUND, QuestionFilter, TopCompany, TrendingTopic,
};
use crate::error::{Result, StorageError};
use crate::models::Question;

const TRENDING_LIMIT: usize = 5;
const TRENDING_WINDOW_DAYS: i64 = 7;

const QUESTION_COLUMNS: &str = r#"
    id, content, company, skill, category, interview_date, experience_level,
    round, source, is_flagged, created_at, updated_at
"#;

#[derive(FromRow)]
struct CountRow {
    name: String,
    count: i64,
}

pub struct QuestionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List visible questions matching the filter, newest first
    pub async fn list(&self, filter: &QuestionFilter, now: DateTime<Utc>) -> Result<Vec<Question>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(QUESTION_COLUMNS);
        query.push(" FROM questions WHERE is_flagged = FALSE");

        if let Some(term) = filter.search_term() {
            let pattern = contains_pattern(term);
            query.push(" AND (content ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR company ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR skill ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR category ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        if let Some(ref company) = filter.company {
            query.push(" AND company ILIKE ");
            query.push_bind(contains_pattern(company));
        }

        if let Some(ref skill) = filter.skill {
            query.push(" AND skill ILIKE ");
            query.push_bind(contains_pattern(skill));
        }

        if let Some(ref round) = filter.round {
            query.push(" AND round = ");
            query.push_bind(round);
        }

        if let Some(ref level) = filter.experience_level {
            query.push(" AND experience_level = ");
            query.push_bind(level);
        }

        if let Some(cutoff) = filter.freshness.and_then(|window| window.cutoff(now)) {
            query.push(" AND created_at >= ");
            query.push_bind(cutoff);
        }

        query.push(" ORDER BY created_at DESC");

        let questions = query.build_query_as::<Question>().fetch_all(self.pool).await?;

        Ok(questions)
    }

    /// List every question including flagged ones, for moderation
    pub async fn list_all(&self) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(questions)
    }

    /// Find a visible question by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1 AND is_flagged = FALSE"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(question)
    }

    pub async fn create(&self, req: &CreateQuestionRequest) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            INSERT INTO questions (
                id, content, company, skill, category, interview_date,
                experience_level, round, source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(req.content.trim())
        .bind(req.company.trim())
        .bind(req.skill.trim())
        .bind(req.category.as_deref().map(str::trim))
        .bind(req.interview_date)
        .bind(req.experience_level.as_deref())
        .bind(req.round.as_deref().unwrap_or(DEFAULT_ROUND))
        .bind(req.source.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(question)
    }

    /// Flag or un-flag a question. Flagged questions are hidden from the feed.
    pub async fn set_flagged(&self, id: Uuid, flagged: bool) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            UPDATE questions
            SET is_flagged = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(flagged)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(question)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Most asked-about skills and categories of the past week, falling
    /// back to all-time skills when the week is empty
    pub async fn trending_topics(&self, now: DateTime<Utc>) -> Result<Vec<TrendingTopic>> {
        let since = now - Duration::days(TRENDING_WINDOW_DAYS);

        let skills = self.count_by("skill", Some(since)).await?;
        let categories = self.count_by("category", Some(since)).await?;
        let trending = merge_trending(skills, categories);

        if !trending.is_empty() {
            return Ok(trending
                .into_iter()
                .map(|(name, count)| TrendingTopic {
                    name,
                    count,
                    period: "this week".to_string(),
                })
                .collect());
        }

        let all_time = self.count_by("skill", None).await?;
        Ok(all_time
            .into_iter()
            .map(|(name, count)| TrendingTopic {
                name,
                count,
                period: "all time".to_string(),
            })
            .collect())
    }

    pub async fn top_companies(&self) -> Result<Vec<TopCompany>> {
        let companies = self.count_by("company", None).await?;

        Ok(companies
            .into_iter()
            .map(|(name, discussions)| TopCompany { name, discussions })
            .collect())
    }

    /// Top values of a text column among visible questions
    async fn count_by(
        &self,
        column: &'static str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(String, i64)>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(column);
        query.push(" AS name, COUNT(*) AS count FROM questions WHERE is_flagged = FALSE AND ");
        query.push(column);
        query.push(" IS NOT NULL AND ");
        query.push(column);
        query.push(" <> ''");

        if let Some(since) = since {
            query.push(" AND created_at >= ");
            query.push_bind(since);
        }

        query.push(" GROUP BY ");
        query.push(column);
        query.push(" ORDER BY count DESC LIMIT ");
        query.push_bind(TRENDING_LIMIT as i64);

        let rows: Vec<CountRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(|row| (row.name, row.count)).collect())
    }
}

/// Combines skill and category counts. A skill wins over a category with
/// the same name; the result is ordered by count and truncated.
pub fn merge_trending(
    skills: Vec<(String, i64)>,
    categories: Vec<(String, i64)>,
) -> Vec<(String, i64)> {
    let mut combined: Vec<(String, i64)> = Vec::with_capacity(skills.len() + categories.len());

    for (name, count) in skills.into_iter().chain(categories) {
        if !combined.iter().any(|(existing, _)| *existing == name) {
            combined.push((name, count));
        }
    }

    combined.sort_by(|a, b| b.1.cmp(&a.1));
    combined.truncate(TRENDING_LIMIT);
    combined
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in the term
/// escaped
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
