//! Application lifecycle - Axum setup and router configuration.
//!
//! Startup runs synchronously on the calling task: resolve configuration,
//! validate it, open the pool, and (in testing mode) re-initialize the
//! database. Only then is the listener bound and the router served.
//!
//! The serve phase depends on [`RunMode`]:
//! - `Production` serves on the calling task until a shutdown signal
//!   arrives, then releases the pool and returns.
//! - `Testing` detaches the serve future onto its own task and returns as
//!   soon as the listener is bound, so an embedding test harness regains
//!   control and can start issuing requests. The pool is released when that
//!   detached task finishes serving.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, HeaderValue, Method};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use mooring_core::{reset_database, ConnectionConfig, Db, RunMode, DEFAULT_SCHEMA_PATH};

use crate::auth::require_bearer;
use crate::routes;
use crate::state::AppState;

/// Origins allowed to make credentialed cross-origin requests: localhost
/// and 127.0.0.1, any scheme, any subdomain, any port.
static ALLOWED_ORIGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)([^/]+\.)?(127\.0\.0\.1|localhost.*)$").expect("origin regex is valid")
});

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3500")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Schema file applied by the testing-mode reset (default: db/schema.sql)
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 3500,
            bind: "127.0.0.1".to_string(),
            schema: None,
        }
    }
}

/// Run the server with the given arguments.
///
/// Every failure surfaces as an error; the binary decides whether that
/// terminates the process.
pub async fn run(args: ServerArgs) -> anyhow::Result<()> {
    let mode = RunMode::from_env();

    // Configuration is resolved and validated before anything touches the
    // network.
    let config = ConnectionConfig::from_env(mode);
    config.validate()?;

    let db = Db::connect(&config).await?;

    if mode.is_testing() {
        let schema = args
            .schema
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));
        info!(schema = %schema.display(), "testing mode: re-initializing database");
        if let Err(err) = reset_database(&db, &schema).await {
            db.close().await;
            return Err(err.into());
        }
    } else {
        info!("production mode: skipping database re-initialization");
    }

    let app = build_router(AppState::new(db.clone()));

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    match mode {
        RunMode::Production => {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            db.close().await;
            info!("server shutdown complete");
        }
        RunMode::Testing => {
            // The listener is already bound, so requests succeed as soon as
            // this returns. Pool release is scoped to the detached task.
            tokio::spawn(async move {
                if let Err(err) = axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                {
                    warn!("server error: {err}");
                }
                db.close().await;
            });
        }
    }

    Ok(())
}

/// Create the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/list", get(routes::users::list_users))
        .route(
            "/create-default",
            post(routes::users::create_default_users)
                .layer(middleware::from_fn(require_bearer)),
        );

    Router::new()
        .route("/healthcheck", get(routes::health::healthcheck))
        .nest("/user", user_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// CORS for local development: credentialed requests from localhost-ish
/// origins only, so the allowlist is a predicate rather than `Any`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| ALLOWED_ORIGIN.is_match(origin))
                .unwrap_or(false)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::CONTENT_LENGTH,
            header::ACCEPT_LANGUAGE,
            header::AUTHORIZATION,
            header::ACCEPT_ENCODING,
            header::CONNECTION,
        ])
        .allow_credentials(true)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
