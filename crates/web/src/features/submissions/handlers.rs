use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::dto::submission::SubmissionStatusResponse;

use crate::error::WebError;
use crate::extract::ClientId;
use crate::state::SubmissionStore;

use super::services;

#[utoipa::path(
    get,
    path = "/api/submissions/limits",
    params(
        ("x-client-id" = Option<String>, Header, description = "Stable anonymous client identifier")
    ),
    responses(
        (status = 200, description = "Whether the caller may submit right now", body = SubmissionStatusResponse)
    ),
    tag = "submissions"
)]
pub async fn get_submission_limits(
    State(store): State<SubmissionStore>,
    client: ClientId,
) -> Result<Response, WebError> {
    let guard = store.guard_for(client.as_str());

    Ok(Json(services::submission_status(&guard, Utc::now())).into_response())
}
