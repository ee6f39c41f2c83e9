use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        question::{QuestionFilter, RankedQuestion, TrendingTopic},
    },
    error::Result,
    models::Question,
    repository::question::QuestionRepository,
    services::ranking::rank_with_scores,
};

/// List questions matching the filter in ranked order, one page at a time
pub async fn list_ranked_questions(
    pool: &PgPool,
    filter: &QuestionFilter,
    now: DateTime<Utc>,
) -> Result<(Vec<RankedQuestion>, i64)> {
    let repo = QuestionRepository::new(pool);
    let questions = repo.list(filter, now).await?;

    Ok(rank_page(questions, &filter.pagination(), now))
}

/// Rank the full result set, then cut out the requested page. Ranks are
/// positions in the full ranking, not within the page.
pub fn rank_page(
    questions: Vec<Question>,
    pagination: &PaginationParams,
    now: DateTime<Utc>,
) -> (Vec<RankedQuestion>, i64) {
    let total_items = questions.len() as i64;

    let ranked: Vec<RankedQuestion> = rank_with_scores(questions, now)
        .into_iter()
        .enumerate()
        .map(|(idx, (question, score))| RankedQuestion {
            rank: idx as i64 + 1,
            score,
            question: question.into(),
        })
        .collect();

    (pagination.slice(ranked), total_items)
}

/// Get a visible question by ID
pub async fn get_question(pool: &PgPool, id: uuid::Uuid) -> Result<Question> {
    let repo = QuestionRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn trending_topics(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<TrendingTopic>> {
    let repo = QuestionRepository::new(pool);
    repo.trending_topics(now).await
}
