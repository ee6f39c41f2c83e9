use axum::{Router, routing::get};

use super::handlers::get_submission_limits;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/limits", get(get_submission_limits))
}
