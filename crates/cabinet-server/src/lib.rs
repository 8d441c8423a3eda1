//! Cabinet HTTP server.
//!
//! Thin JSON layer over [`cabinet_core::Clinic`]: one handler per route,
//! errors mapped to the `{success: false, ...}` shapes by [`error::ApiError`].

pub mod config;
pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use cabinet_core::Clinic;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ServerSettings};

/// Shared state for the handlers.
#[derive(Clone)]
pub struct AppState {
    pub clinic: Arc<Clinic>,
}

/// CORS restricted to the configured origins, the API's methods and
/// `Content-Type`.
pub fn cors_layer(settings: &ServerSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router.
pub fn build_router(clinic: Arc<Clinic>, settings: &ServerSettings) -> Router {
    let state = AppState { clinic };

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/cabinet-info", get(routes::cabinet_info))
        .route("/api/update-cabinet", post(routes::update_cabinet))
        .route("/api/get-patients", get(routes::get_patients))
        .route("/api/add-patient", post(routes::add_patient))
        .route("/api/update-patient/:id", put(routes::update_patient))
        .route("/api/delete-patient/:id", delete(routes::delete_patient))
        .route("/api/dashboard-stats", get(routes::dashboard_stats))
        .route("/api/chat", post(routes::chat))
        .route("/api/export-chat-pdf", post(routes::export_chat_pdf))
        .with_state(state)
        .layer(cors_layer(settings))
        .layer(TraceLayer::new_for_http())
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Open the clinic and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let clinic = Clinic::open(&config.clinic_settings()).context("Failed to open record store")?;
    let app = build_router(Arc::new(clinic), &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;

    info!(%addr, backend = config.store.backend.as_str(), "cabinet API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Cabinet API server failed")?;

    info!("cabinet API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
