use axum::{Router, routing::get};

use super::handlers::{create_question, get_question, list_questions, trending_topics};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route("/trending", get(trending_topics))
        .route("/:id", get(get_question))
}
