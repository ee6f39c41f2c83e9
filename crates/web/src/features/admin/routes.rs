use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{approve_question, delete_question, flag_question, list_all_questions};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_all_questions))
        .route("/questions/:id", delete(delete_question))
        .route("/questions/:id/flag", post(flag_question))
        .route("/questions/:id/approve", post(approve_question))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
