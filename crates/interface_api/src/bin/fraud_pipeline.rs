//! Claims Fraud Screening - Pipeline Binary
//!
//! Runs the screening pipeline once, then serves the dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin fraud-pipeline
//!
//! # Point at other inputs and skip the dashboard
//! FRAUD_INPATIENT_PATH=/data/inpatient.csv FRAUD_SERVE_DASHBOARD=false cargo run --bin fraud-pipeline
//! ```
//!
//! # Environment Variables
//!
//! * `FRAUD_BENEFICIARIES_PATH`, `FRAUD_INPATIENT_PATH`, `FRAUD_OUTPATIENT_PATH`,
//!   `FRAUD_PROVIDERS_PATH` - source CSV files
//! * `FRAUD_DATABASE_URL` - SQLite database (default: sqlite://insurance_fraud.db)
//! * `FRAUD_CHART_PATH` - score chart (default: fraud_risk_scores.svg)
//! * `FRAUD_DICTIONARY_PATH` - data dictionary (default: data_dictionary.md)
//! * `FRAUD_HOST`, `FRAUD_PORT` - dashboard address (default: 127.0.0.1:8501)
//! * `FRAUD_SERVE_DASHBOARD` - serve the dashboard after the run (default: true)
//! * `FRAUD_SKIP_PIPELINE` - serve the stored snapshot without running (default: false)
//! * `FRAUD_LOG_LEVEL` - log level when `RUST_LOG` is unset (default: info)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::TableStore;
use infra_db::{create_pool, DatabaseConfig, SqliteTableStore};
use interface_api::{create_router, load_snapshot, AppState, Pipeline, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = PipelineConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(database = %config.database_url, "Starting claims fraud screening");

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("Failed to open the record store")?;
    let store: Arc<dyn TableStore> = Arc::new(SqliteTableStore::new(pool));

    let results = if config.skip_pipeline {
        load_snapshot(store.as_ref())
            .await
            .context("Failed to load the scored snapshot")?
    } else {
        let outcome = Pipeline::new(config.clone(), store.clone())
            .run()
            .await
            .context("Pipeline run failed")?;

        println!(
            "Beneficiaries: {} ({} with a chronic condition)",
            outcome.beneficiaries.total, outcome.beneficiaries.with_chronic_condition
        );
        println!("{}", outcome.console_sample);
        println!("Score chart written to {}", config.chart_path.display());
        println!("Data dictionary written to {}", config.dictionary_path.display());
        outcome.results
    };

    if !config.serve_dashboard {
        return Ok(());
    }

    let app = create_router(AppState::new(results, store));
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid dashboard address {}", config.server_addr()))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server failed")?;

    tracing::info!("Dashboard shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
