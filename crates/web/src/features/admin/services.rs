use sqlx::PgPool;
use storage::{error::Result, models::Question, repository::question::QuestionRepository};
use uuid::Uuid;

/// List every question, flagged ones included
pub async fn list_all_questions(pool: &PgPool) -> Result<Vec<Question>> {
    let repo = QuestionRepository::new(pool);
    repo.list_all().await
}

/// Hide a question from the public feed
pub async fn flag_question(pool: &PgPool, id: Uuid) -> Result<Question> {
    let repo = QuestionRepository::new(pool);
    let question = repo.set_flagged(id, true).await?;
    tracing::info!(question_id = %id, "Question flagged");
    Ok(question)
}

/// Restore a flagged question to the public feed
pub async fn approve_question(pool: &PgPool, id: Uuid) -> Result<Question> {
    let repo = QuestionRepository::new(pool);
    let question = repo.set_flagged(id, false).await?;
    tracing::info!(question_id = %id, "Question approved");
    Ok(question)
}

pub async fn delete_question(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = QuestionRepository::new(pool);
    repo.delete(id).await?;
    tracing::info!(question_id = %id, "Question deleted");
    Ok(())
}
