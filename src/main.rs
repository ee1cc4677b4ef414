use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod mood;
mod services;

use config::Config;
use mood::classify::RemoteClassifier;
use mood::MoodResolver;
use services::diary::DiaryService;
use services::llm::{GroqClient, LlmClient};
use services::session::SessionStore;
use services::store::{DiaryStore, PgDiaryStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub diary: DiaryService,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swasthya_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database
    let db = db::create_pool(&config.database_url).await;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    // Hosted models: one client per call path, each with its own budget.
    let chat: Arc<dyn LlmClient> = Arc::new(
        GroqClient::new(&config.groq_base_url, &config.groq_api_key, config.chat_model.clone())
            .expect("Failed to build chat model client"),
    );
    let classifier_llm: Arc<dyn LlmClient> = Arc::new(
        GroqClient::new(
            &config.groq_base_url,
            &config.groq_api_key,
            config.classifier_model.clone(),
        )
        .expect("Failed to build classifier model client"),
    );
    let classifier: Arc<dyn MoodResolver> = Arc::new(RemoteClassifier::new(
        classifier_llm,
        config.classifier_model.max_retries,
    ));

    let store: Arc<dyn DiaryStore> = Arc::new(PgDiaryStore::new(db.clone()));
    let diary = DiaryService::new(store, chat, classifier, SessionStore::new());

    let state = AppState {
        db,
        config: config.clone(),
        diary,
    };

    // Build routes
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        // Diary
        .route("/api/diary/entries", post(handlers::diary::create_entry))
        .route("/api/diary/entries", get(handlers::diary::list_entries))
        .route("/api/diary/session", get(handlers::diary::get_session))
        // Mood analytics
        .route("/api/mood/summary", get(handlers::analytics::get_mood_summary))
        .route(
            "/api/mood/analytics",
            get(handlers::analytics::get_mood_analytics),
        )
        // Auth actions requiring a session
        .route("/api/auth/logout", post(handlers::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
