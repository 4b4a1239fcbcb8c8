mod api;
mod config;
mod db;
mod engagement;
mod rng;
mod scheduler;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glimpse_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = config::Settings::new().expect("Failed to load settings");

    // Initialize database
    let db = db::Database::new(&settings.database.path)
        .expect("Failed to create database");

    db.initialize()
        .expect("Failed to initialize database schema");

    // Always seed demo content for development
    db.seed_demo_data()
        .expect("Failed to seed demo data");
    tracing::info!("Demo data seeded successfully");

    tracing::info!("Database initialized successfully");

    // Put wave jobs a previous process left mid-run back in the queue
    let job_repo = db::repositories::JobRepository::new(db.pool.clone());
    match job_repo.reset_stale_running() {
        Ok(count) => {
            if count > 0 {
                tracing::info!("Requeued {} interrupted wave jobs on startup", count);
            }
        }
        Err(e) => {
            tracing::error!("Failed to requeue interrupted wave jobs: {}", e);
        }
    }

    // An empty actor pool means every engagement request will fail
    let profile_repo = db::repositories::ProfileRepository::new(db.pool.clone());
    match profile_repo.count_bots() {
        Ok(0) => tracing::warn!("No synthetic actor profiles found; seed some before generating engagement"),
        Ok(count) => tracing::info!("Synthetic actor pool ready ({} profiles)", count),
        Err(e) => tracing::error!("Failed to count synthetic actors: {}", e),
    }

    // Master RNG; a fixed seed in the settings makes runs reproducible
    let rng = rng::SharedRng::from_config(settings.engagement.rng_seed);

    // Create application state
    let state = AppState::new(db.clone(), rng);

    // Start the background scheduler for delayed engagement waves
    let wave_scheduler = scheduler::WaveScheduler::new(db);
    tokio::spawn(wave_scheduler.run());

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Engagement routes
        .route("/api/bot-engagement", post(api::engagement::bot_engagement))
        .route("/api/reel-engagement", post(api::engagement::reel_engagement))
        .route("/api/engagement-jobs/:post_id", get(api::jobs::list_jobs))
        .with_state(state)
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

async fn health_check() -> &'static str {
    "OK"
}
