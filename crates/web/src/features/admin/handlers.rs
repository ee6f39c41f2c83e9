use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::question::AdminQuestionResponse};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/questions",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All questions including flagged ones", body = Vec<AdminQuestionResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn list_all_questions(State(db): State<Database>) -> Result<Response, WebError> {
    let questions = services::list_all_questions(db.pool()).await?;

    let response: Vec<AdminQuestionResponse> = questions
        .into_iter()
        .map(AdminQuestionResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/questions/{id}/flag",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Question flagged", body = AdminQuestionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found")
    ),
    tag = "admin"
)]
pub async fn flag_question(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let question = services::flag_question(db.pool(), id).await?;

    Ok(Json(AdminQuestionResponse::from(question)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/questions/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Question approved", body = AdminQuestionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found")
    ),
    tag = "admin"
)]
pub async fn approve_question(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let question = services::approve_question(db.pool(), id).await?;

    Ok(Json(AdminQuestionResponse::from(question)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Question deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found")
    ),
    tag = "admin"
)]
pub async fn delete_question(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_question(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
