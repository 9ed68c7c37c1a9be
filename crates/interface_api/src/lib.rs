//! Fraud Screening Interface Layer
//!
//! This crate drives the screening pipeline and exposes its results.
//!
//! # Architecture
//!
//! - **Config**: layered configuration from defaults and `FRAUD_*` variables
//! - **Pipeline**: ingest, clean, score, snapshot, static outputs
//! - **Output**: console sample, SVG score chart, data dictionary file
//! - **Handlers**: the HTML dashboard, the JSON claims endpoint, health checks
//! - **Error Handling**: JSON error responses and pipeline stage failures
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, Pipeline};
//!
//! let outcome = Pipeline::new(config, store.clone()).run().await?;
//! let app = create_router(AppState::new(outcome.results, store));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod output;
pub mod pipeline;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::TableStore;

use crate::handlers::{claims, dashboard, health};
use crate::middleware::request_logging_middleware;

pub use crate::config::PipelineConfig;
pub use crate::error::{ApiError, PipelineError};
pub use crate::pipeline::{load_snapshot, Pipeline, PipelineOutcome, ScreeningResults};

/// Application state shared across handlers
///
/// The scored claims are immutable for the life of the server; requests
/// only read them.
#[derive(Clone)]
pub struct AppState {
    pub results: Arc<ScreeningResults>,
    pub store: Arc<dyn TableStore>,
}

impl AppState {
    pub fn new(results: ScreeningResults, store: Arc<dyn TableStore>) -> Self {
        Self {
            results: Arc::new(results),
            store,
        }
    }
}

/// Creates the dashboard router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/claims", get(claims::list_claims));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
