mod autofill;
mod backend_client;
mod config;
mod errors;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::autofill::{AutofillEngine, ImmediateScheduler, Scheduler, TokioScheduler};
use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting autofill service v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(config.backend_url.clone(), config.backend_timeout())?;
    info!("Backend client initialized ({})", config.backend_url);

    let timings = config.timings();
    let scheduler: Arc<dyn Scheduler> = if timings.is_zero() {
        Arc::new(ImmediateScheduler)
    } else {
        Arc::new(TokioScheduler)
    };
    let engine = AutofillEngine::new(scheduler, timings);
    info!(
        "Autofill delays: initial {}ms, verify {}ms",
        timings.initial_delay.as_millis(),
        timings.verify_delay.as_millis()
    );

    let state = AppState {
        config: config.clone(),
        backend,
        engine,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // Any origin: the extension calls from arbitrary job-board pages.
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
