use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        question::{
            CreateQuestionRequest, QuestionDetailResponse, QuestionFilter, QuestionResponse,
            RankedQuestion, TrendingTopic,
        },
    },
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::ClientId;
use crate::features::submissions::services as submissions;
use crate::state::SubmissionStore;

use super::services;

#[utoipa::path(
    get,
    path = "/api/questions",
    params(QuestionFilter),
    responses(
        (status = 200, description = "Ranked questions retrieved successfully", body = PaginatedResponse<RankedQuestion>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "questions"
)]
pub async fn list_questions(
    State(db): State<Database>,
    Query(filter): Query<QuestionFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (entries, total_items) =
        services::list_ranked_questions(db.pool(), &filter, Utc::now()).await?;

    let response = PaginatedResponse::new(entries, filter.page, filter.page_size, total_items);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question found", body = QuestionDetailResponse),
        (status = 404, description = "Question not found")
    ),
    tag = "questions"
)]
pub async fn get_question(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let question = services::get_question(db.pool(), id).await?;

    Ok(Json(QuestionDetailResponse::from(question)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionRequest,
    params(
        ("x-client-id" = Option<String>, Header, description = "Stable anonymous client identifier")
    ),
    responses(
        (status = 201, description = "Question submitted successfully", body = QuestionResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Near-duplicate of a recent submission"),
        (status = 429, description = "Submission limit reached")
    ),
    tag = "questions"
)]
pub async fn create_question(
    State(db): State<Database>,
    State(store): State<SubmissionStore>,
    client: ClientId,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<Response, WebError> {
    let guard = store.guard_for(client.as_str());

    let question = submissions::submit_question(db.pool(), &guard, &req, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/questions/trending",
    responses(
        (status = 200, description = "Trending skills and categories", body = Vec<TrendingTopic>)
    ),
    tag = "questions"
)]
pub async fn trending_topics(State(db): State<Database>) -> Result<Response, WebError> {
    let topics = services::trending_topics(db.pool(), Utc::now()).await?;

    Ok(Json(topics).into_response())
}
