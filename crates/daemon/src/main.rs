#![forbid(unsafe_code)]

//! bankwatch daemon: owns the task file and serves the watch API.

use std::sync::Arc;

use bankwatch_core::{TaskStore, Watchdesk};
use bankwatch_daemon::{
    cli::{self, Cli},
    http,
};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_error = cli::load_dotenv();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(e) = dotenv_error {
        warn!(error = %e, ".env not loaded");
    }

    let config = cli.upstream_config()?;
    let store = TaskStore::open(&cli.tasks_file).await?;
    info!(
        upstream = %config.base_url,
        tasks_file = %store.path().display(),
        page_mode = ?config.page_mode,
        empty_policy = ?config.empty_policy,
        "starting daemon"
    );

    let desk = Arc::new(Watchdesk::new(store, config));
    let app = http::router(desk);

    info!(listen = %cli.listen, "listening");
    axum::serve(tokio::net::TcpListener::bind(cli.listen).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
