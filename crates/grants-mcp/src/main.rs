mod api;
mod config;
mod error;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::AppError;
use grant_store::store::GrantStore;
use server::GrantsServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting grants MCP server");

    let config = Config::from_env()?;
    info!(
        catalog = %config.catalog_source(),
        tcp = config.tcp_listen_addr.is_some(),
        "configuration loaded"
    );

    let store = load_store(&config)?;
    let fingerprint = store.fingerprint()?;
    info!(
        records = store.len(),
        fingerprint = %fingerprint,
        source = %config.catalog_source(),
        "grant catalog loaded"
    );

    let server = GrantsServer::new(Arc::new(store), config.catalog_source());

    if let Some(addr) = config.tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

fn load_store(config: &Config) -> Result<GrantStore, AppError> {
    let store = match config.grants_file.as_deref() {
        Some(path) => GrantStore::from_path(path)?,
        None => GrantStore::load()?,
    };
    Ok(store)
}
