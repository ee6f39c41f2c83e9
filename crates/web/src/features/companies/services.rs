use sqlx::PgPool;
use storage::{
    dto::question::TopCompany, error::Result, repository::question::QuestionRepository,
};

/// Companies with the most visible questions
pub async fn top_companies(pool: &PgPool) -> Result<Vec<TopCompany>> {
    let repo = QuestionRepository::new(pool);
    repo.top_companies().await
}
