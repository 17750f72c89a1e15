//! Event Hive web client.
//!
//! With the `server` feature this binary is the host process: it serves the
//! server-rendered Dioxus app behind axum. Without it, it is the browser entry
//! point.

#[cfg(feature = "server")]
use anyhow::Result;
use event_hive_client::app::App;

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(App);
}

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<()> {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use event_hive_client::config;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_hive_client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Event Hive client v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config::load_server_config()?;
    let client_config = config::ClientConfig::from_build_env();
    tracing::info!(
        "Configuration loaded, bind: {}, backend: {}",
        server_config.addr(),
        client_config.api_base
    );

    let app = axum::Router::new()
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = server_config.addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it
#[cfg(feature = "server")]
async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            result = signal::ctrl_c() => interrupted(result).await,
            _ = sigterm.recv() => tracing::info!("SIGTERM received, stopping server"),
        },
        Err(e) => {
            tracing::warn!("SIGTERM not handled ({}), stop with Ctrl+C", e);
            interrupted(signal::ctrl_c().await).await;
        }
    }

    #[cfg(not(unix))]
    interrupted(signal::ctrl_c().await).await;
}

/// A broken Ctrl+C listener must not stop the server, so it never resolves
#[cfg(feature = "server")]
async fn interrupted(listener: std::io::Result<()>) {
    match listener {
        Ok(()) => tracing::info!("Interrupted, stopping server"),
        Err(e) => {
            tracing::error!("Ctrl+C listener failed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
