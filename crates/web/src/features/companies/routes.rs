use axum::{Router, routing::get};

use super::handlers::top_companies;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/top", get(top_companies))
}
