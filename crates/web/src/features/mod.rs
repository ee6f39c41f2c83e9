pub mod admin;
pub mod companies;
pub mod questions;
pub mod submissions;

use axum::Router;

use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

pub fn router(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::routes::routes())
        .nest("/companies", companies::routes::routes())
        .nest("/submissions", submissions::routes::routes())
        .nest("/admin", admin::routes::routes(api_keys))
}
