//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! This module builds the shared [`AppState`], creates the Axum router with
//! every route and middleware layer, and starts the HTTP server.

// region: --- Imports
use crate::chat::{chat_websocket, ChatAppState};
use crate::handlers;
use crate::middleware::{log_requests, stamp_req};
use crate::services::DetectionService;
use axum::{routing::{get, post}, Router};
use lib_core::{create_pool, run_migrations, Config, DbPool};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub chat: Arc<ChatAppState>,
    pub detection: Arc<DetectionService>,
}

impl AppState {
    /// Build every service from the loaded configuration.
    pub fn new(db: DbPool, config: Config) -> Self {
        let chat = Arc::new(ChatAppState::from_config(db.clone(), &config));
        let detection = Arc::new(DetectionService::from_config(&config));
        Self { db, config, chat, detection }
    }
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ChatAppState> {
    fn from_ref(state: &AppState) -> Self {
        state.chat.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<DetectionService> {
    fn from_ref(state: &AppState) -> Self {
        state.detection.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Allowed CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => tracing_subscriber::EnvFilter::new("trace"),
        "debug" => tracing_subscriber::EnvFilter::new("debug"),
        "info" => tracing_subscriber::EnvFilter::new("info"),
        "warn" => tracing_subscriber::EnvFilter::new("warn"),
        "error" => tracing_subscriber::EnvFilter::new("error"),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(" HEALTH FORUM BACKEND STARTING");
    info!(" Log level: {}", log_level);

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Database URL: {}", app_config.database_url);
    ensure_database_dir(&app_config.database_url)?;

    info!("Connecting to database...");
    let pool = create_pool(&app_config.database_url).await?;

    info!(" Running database migrations");
    run_migrations(&pool).await?;
    info!(" Migrations complete");

    if app_config.assistant_configured() {
        info!(" Assistant model: {}", app_config.gemini_model);
    }
    if app_config.roboflow_api_key.is_none() {
        tracing::warn!(" ROBOFLOW_API_KEY not set; /detect will fail with a configuration error");
    }

    let state = AppState::new(pool, app_config);
    let app = create_router(state, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info();

    // ConnectInfo is required by the WebSocket handler
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let db_path = rest.trim_start_matches("//");
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    if db_path.is_empty() || db_path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            info!("Created database directory: {:?}", parent);
        }
    }
    info!("Database file will be at: {}", db_path);
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    use axum::http::{HeaderValue, Method};

    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route("/ws", get(chat_websocket))
        .route("/previous-questions", get(handlers::questions::previous_questions))
        .route("/submit-report", post(handlers::alerts::submit_report))
        .route("/alerts", get(handlers::alerts::list_alerts))
        .route("/detect", post(handlers::detect::detect))
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        // Later layers wrap earlier ones: stamp_req runs before log_requests
        .layer(axum::middleware::from_fn(log_requests))
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(|error: tower_http::classify::ServerErrorsFailureClass, latency: std::time::Duration, span: &tracing::Span| {
                    let _enter = span.enter();
                    tracing::error!(
                        error = ?error,
                        latency_ms = latency.as_millis(),
                        "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                        error,
                        latency.as_millis()
                    );
                }),
        )
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" CHAT:");
    info!("   • GET  /ws  (send text; prefix with /help to ask the assistant)");
    info!(" FORUM:");
    info!("   • GET  /previous-questions");
    info!(" ALERTS:");
    info!("   • POST /submit-report");
    info!("   • GET  /alerts");
    info!(" DETECTION:");
    info!("   • POST /detect");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::command::NOTICE_NOT_CONFIGURED;
    use futures_util::{SinkExt, StreamExt};
    use lib_core::model::store::memory_pool;
    use std::time::Duration;
    use tokio_tungstenite::{connect_async, tungstenite::Message};

    async fn spawn_server() -> SocketAddr {
        let pool = memory_pool().await.unwrap();
        let app = create_router(AppState::new(pool, Config::default()), Vec::new());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });
        addr
    }

    async fn next_text<S>(stream: &mut S) -> String
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        let msg = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out waiting for a frame")
            .unwrap()
            .unwrap();
        msg.to_text().unwrap().to_string()
    }

    #[test]
    fn test_ensure_database_dir_skips_memory() {
        assert!(ensure_database_dir("sqlite::memory:").is_ok());
        assert!(ensure_database_dir("postgres://nope").is_ok());
    }

    #[tokio::test]
    async fn test_chat_roundtrip_over_websocket() {
        let addr = spawn_server().await;
        let url = format!("ws://{}/ws", addr);

        let (mut alice, _) = connect_async(url.as_str()).await.unwrap();
        let (mut bob, _) = connect_async(url.as_str()).await.unwrap();
        // Let both upgrades finish registering
        tokio::time::sleep(Duration::from_millis(100)).await;

        alice.send(Message::text("hello room")).await.unwrap();
        assert_eq!(next_text(&mut alice).await, "hello room");
        assert_eq!(next_text(&mut bob).await, "hello room");

        // No assistant configured: only the sender hears about it
        alice.send(Message::text("/help what is glaucoma")).await.unwrap();
        assert_eq!(next_text(&mut alice).await, NOTICE_NOT_CONFIGURED);

        let nothing = tokio::time::timeout(Duration::from_millis(200), bob.next()).await;
        assert!(nothing.is_err(), "other sessions must not see the notice");
    }

    #[tokio::test]
    async fn test_disconnected_client_leaves_room() {
        let addr = spawn_server().await;
        let url = format!("ws://{}/ws", addr);

        let (alice, _) = connect_async(url.as_str()).await.unwrap();
        let (mut bob, _) = connect_async(url.as_str()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        drop(alice);
        tokio::time::sleep(Duration::from_millis(100)).await;

        bob.send(Message::text("anyone?")).await.unwrap();
        assert_eq!(next_text(&mut bob).await, "anyone?");
    }
}
