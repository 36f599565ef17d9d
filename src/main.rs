//! MLB Gameday API binary entrypoint wiring the cache, workers, and SSE
//! fan-out behind the HTTP surface.

use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tokio::{net::TcpListener, sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dto;
mod error;
mod routes;
mod services;
mod state;
mod upstream;
mod workers;

use config::AppConfig;
use dto::sse::ServerEvent;
use services::sse_service;
use state::AppState;

/// Depth of the internal channel between the workers and the broadcast pump.
const UPDATE_CHANNEL_DEPTH: usize = 32;

/// Hard bound on how long graceful shutdown may wait for open connections.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is a development convenience; its absence is fine
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;

    let cancel = CancellationToken::new();
    let app_state = AppState::new(&config, cancel.clone()).context("building app state")?;

    let (updates_tx, updates_rx) = mpsc::channel::<ServerEvent>(UPDATE_CHANNEL_DEPTH);

    // Background workers drive the cache and feed the updates channel.
    let discovery = tokio::spawn(workers::discovery::run(
        app_state.clone(),
        updates_tx.clone(),
        cancel.clone(),
    ));
    let audit = tokio::spawn(workers::audit::run(
        app_state.clone(),
        updates_tx.clone(),
        cancel.clone(),
    ));

    // The pump is the channel's only consumer; it exits once every sender is
    // gone.
    let pump = tokio::spawn(sse_service::pump(app_state.clone(), updates_rx));

    // Shutdown observer: once the token fires, wait for the workers to
    // quiesce, then drop the last sender to close the updates channel.
    let observer = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            cancel.cancelled().await;
            info!("shutdown requested, waiting for workers");
            let _ = discovery.await;
            let _ = audit.await;
            drop(updates_tx);
            info!("workers stopped, updates channel closed");
        }
    });

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            info!("received terminate signal");
            cancel.cancel();
        }
    });

    let app = build_router(app_state, &config);

    let addr = config.bind_addr();
    info!(%addr, "starting server");
    let listener = TcpListener::bind(&addr).await.context("binding server")?;

    let graceful = {
        let cancel = cancel.clone();
        async move { cancel.cancelled().await }
    };
    tokio::select! {
        served = axum::serve(listener, app.into_make_service()).with_graceful_shutdown(graceful) => {
            served.context("serving axum")?;
        }
        // Open SSE streams can hold graceful shutdown forever; cut them loose
        // once the deadline passes.
        _ = async { cancel.cancelled().await; sleep(SHUTDOWN_DEADLINE).await } => {
            warn!("graceful shutdown deadline expired, closing remaining connections");
        }
    }

    let _ = observer.await;
    let _ = pump.await;
    info!("shutdown complete");

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState, config: &AppConfig) -> Router<()> {
    routes::router(state)
        .layer(build_cors(config))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy from the configured origin whitelist; the surface is GET-only.
fn build_cors(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(origins)
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
