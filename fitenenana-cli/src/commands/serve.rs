//! Web application server command

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use fitenenana::prelude::*;
use tokio::net::TcpListener;

/// Start the web application
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if logging is already initialized, the address is
    /// invalid or the listener cannot bind
    pub async fn execute(self, mut config: FitenenanaConfig) -> Result<()> {
        observability::init()?;

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        let addr = config
            .server
            .socket_addr()
            .context("Invalid server address")?;

        let state = AppState::initialize(config).await;
        spawn_session_purge(state.sessions().clone());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        println!(
            "{} {}",
            style("Listening on").green().bold(),
            style(format!("http://{addr}")).cyan()
        );
        tracing::info!(%addr, "Server started");

        axum::serve(listener, screens::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

fn spawn_session_purge(sessions: SessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions purged");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
