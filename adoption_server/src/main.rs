//! Adoption server: loads config from the environment, opens storage, serves the API until Ctrl-C,
//! then closes storage.
//!
//! Run from repo root: `cargo run -p adoption-server`

use adoption_api::{app, AppConfig, AppState, Storage};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adoption_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let storage = Storage::open(&config).await?;
    let state = AppState::new(storage.clone());

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        backend = storage.backend_name(),
        "adoption api listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, app(state, config.body_limit))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
