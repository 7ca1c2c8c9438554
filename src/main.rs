//! Alumni Sheets Backend
//!
//! REST backend for the alumni association site. Google Sheets is the only
//! data store: members, executives, news, jobs, reports, support requests
//! and votes are all read from spreadsheets, and votes are appended to one.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod session;
mod sheets;
mod store;
mod votes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use session::SessionStore;
use store::Repository;
use votes::VoteService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub votes: Arc<VoteService>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the repository and vote pipeline over the given transports.
    pub fn new(
        config: Config,
        reader: Arc<dyn sheets::SheetReader>,
        writer: Arc<dyn sheets::VoteWriter>,
    ) -> Self {
        let config = Arc::new(config);
        let repo = Repository::new(reader, config.clone());
        let sessions = Arc::new(SessionStore::new(config.session_path.clone()));

        Self {
            votes: Arc::new(VoteService::new(repo.clone(), writer)),
            repo: Arc::new(repo),
            sessions,
            config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Alumni Sheets Backend");
    tracing::info!("Sheets API: {}", config.sheets_base_url);
    tracing::info!("Session path: {:?}", config.session_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.is_configured() {
        tracing::warn!(
            "Google Sheets is not fully configured (ALUMNI_SHEETS_API_KEY and spreadsheet ids). \
             Reads of unconfigured sheets will fail."
        );
    }
    if config.shared_password.is_empty() {
        tracing::warn!("No shared password configured (ALUMNI_SHARED_PASSWORD). Login is disabled!");
    }

    let (reader, writer) = sheets::build_transports(&config)?;
    let bind_addr = config.bind_addr;
    let state = AppState::new(config, reader, writer);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Directory
        .route("/members", get(api::list_members))
        .route("/executives", get(api::list_executives))
        // Content
        .route("/news", get(api::list_news))
        .route("/jobs", get(api::list_jobs))
        .route("/reports", get(api::list_reports))
        // Support and votes
        .route("/support", get(api::list_support_requests))
        .route(
            "/support/votes",
            post(api::submit_vote).get(api::list_voted_requests),
        )
        // Home page and diagnostics
        .route("/stats", get(api::get_stats))
        .route("/connections", get(api::test_connections))
        // Session
        .route(
            "/session",
            post(api::login)
                .get(api::current_session)
                .delete(api::logout),
        );

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
