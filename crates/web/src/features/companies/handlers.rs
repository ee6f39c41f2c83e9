use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::question::TopCompany};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/companies/top",
    responses(
        (status = 200, description = "Companies with the most questions", body = Vec<TopCompany>)
    ),
    tag = "companies"
)]
pub async fn top_companies(State(db): State<Database>) -> Result<Response, WebError> {
    let companies = services::top_companies(db.pool()).await?;

    Ok(Json(companies).into_response())
}
