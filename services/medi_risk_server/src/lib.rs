//! HTTP and browser-form front-ends for the diabetes risk classifier.
//!
//! The model is loaded once by [`run`] and shared read-only by every
//! request through [`AppState`].

pub mod config;
pub mod error;
pub mod form;
pub mod routes;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use medi_risk::Predictor;
use minijinja::Environment;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub use config::{Cli, ServerConfig};
pub use error::ServerError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    /// Shared state with the form templates compiled once.
    pub fn new(predictor: Predictor) -> Result<Self, ServerError> {
        Ok(Self {
            predictor,
            templates: Arc::new(form::templates()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(form::index))
        .route("/assess", post(form::assess))
        .route("/predict", post(routes::predict))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

/// Load the model, bind and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let predictor = Predictor::load(&config.model_path)?;
    let app = router(AppState::new(predictor)?);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    log::info!("medi-risk-server listening on http://{}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}
