use std::time::Duration;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::questions::handlers::list_questions,
        features::questions::handlers::get_question,
        features::questions::handlers::create_question,
        features::questions::handlers::trending_topics,
        features::companies::handlers::top_companies,
        features::submissions::handlers::get_submission_limits,
        features::admin::handlers::list_all_questions,
        features::admin::handlers::flag_question,
        features::admin::handlers::approve_question,
        features::admin::handlers::delete_question,
    ),
    components(
        schemas(
            storage::dto::question::CreateQuestionRequest,
            storage::dto::question::QuestionResponse,
            storage::dto::question::QuestionDetailResponse,
            storage::dto::question::RankedQuestion,
            storage::dto::question::AdminQuestionResponse,
            storage::dto::question::FreshnessWindow,
            storage::dto::question::TrendingTopic,
            storage::dto::question::TopCompany,
            storage::dto::submission::SubmissionCheck,
            storage::dto::submission::SubmissionStatusResponse,
            storage::dto::submission::ContributorType,
            storage::dto::common::PaginationMeta,
            storage::models::ConfidenceLevel,
            storage::models::Question,
        )
    ),
    tags(
        (name = "questions", description = "Browse and submit interview questions"),
        (name = "companies", description = "Company statistics"),
        (name = "submissions", description = "Per-client submission limits"),
        (name = "admin", description = "Moderation endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn app(state: AppState, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", features::router(api_keys))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting AskTaaza API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let submissions = config.submission_store()?;
    match &config.submission_store_dir {
        Some(dir) => tracing::info!("Submission history stored in {}", dir.display()),
        None => tracing::warn!("SUBMISSION_STORE_DIR not set, submission history kept in memory"),
    }

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, admin endpoints will reject every request");
    }

    let app = app(AppState::new(db, submissions), api_keys);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/questions",
            "/api/questions/{id}",
            "/api/questions/trending",
            "/api/companies/top",
            "/api/submissions/limits",
            "/api/admin/questions",
            "/api/admin/questions/{id}",
            "/api/admin/questions/{id}/flag",
            "/api/admin/questions/{id}/approve",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
