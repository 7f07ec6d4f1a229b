//! Quiz Seasons API Server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod auth;
mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quiz_seasons_api=debug".parse()?)
                .add_directive("engine=debug".parse()?),
        )
        .init();

    info!("Starting Quiz Seasons API");

    // Load configuration
    let config = common::Config::from_env();

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pool));

    // Build API router with state
    let app = Router::new()
        .route("/health", get(routes::health::health))
        // Identity
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/profile", get(routes::auth::profile))
        // Seasons
        .route(
            "/api/seasons",
            get(routes::seasons::list).post(routes::seasons::create),
        )
        .route("/api/seasons/user/progress", get(routes::seasons::user_progress))
        .route(
            "/api/seasons/:id",
            get(routes::seasons::get)
                .patch(routes::seasons::update)
                .delete(routes::seasons::delete),
        )
        .route("/api/seasons/:id/start", post(routes::seasons::start))
        .route("/api/seasons/:id/complete", post(routes::seasons::complete))
        // Questions
        .route(
            "/api/questions",
            get(routes::questions::list).post(routes::questions::create),
        )
        .route(
            "/api/questions/user/progress",
            get(routes::questions::user_progress),
        )
        .route(
            "/api/questions/season/:season_id",
            get(routes::questions::by_season),
        )
        .route(
            "/api/questions/:id",
            get(routes::questions::get)
                .patch(routes::questions::update)
                .delete(routes::questions::delete),
        )
        .route("/api/questions/:id/submit", post(routes::questions::submit))
        // Ingestion
        .route("/api/ingest/upload", post(routes::ingest::upload))
        .route("/api/ingest/status/:job_id", get(routes::ingest::status))
        .route("/api/ingest/result/:job_id", get(routes::ingest::result))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
