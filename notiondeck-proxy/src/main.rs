//! `NotionDeck` proxy server -- REST front for a single Notion database.
//!
//! An axum HTTP server that lists, creates, and archives items in one Notion
//! database on behalf of clients. The Notion token never leaves the proxy.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3001
//! NOTION_TOKEN=secret_... DATABASE_ID=... cargo run --bin notiondeck-proxy
//!
//! # Run on custom address
//! cargo run --bin notiondeck-proxy -- --bind 127.0.0.1:8080 --database-id ...
//! ```

use std::sync::Arc;

use clap::Parser;
use notiondeck_proxy::adapter::ItemAdapter;
use notiondeck_proxy::config::{ProxyCliArgs, ProxyConfig};
use notiondeck_proxy::server::{self, ProxyState};
use notiondeck_proxy::upstream::NotionClient;

#[tokio::main]
async fn main() {
    let cli = ProxyCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ProxyConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.uses_placeholders() {
        tracing::warn!("notion token or database id not configured; upstream calls will fail");
    }

    let client = match NotionClient::with_base_url(
        &config.notion_base_url,
        config.token.clone(),
        config.database_id.clone(),
    ) {
        Ok(c) => c.with_version(config.notion_version.clone()),
        Err(e) => {
            tracing::error!(error = %e, "invalid notion base url");
            std::process::exit(1);
        }
    };

    let adapter = ItemAdapter::new(client);
    tracing::info!(
        addr = %config.bind_addr,
        database_id = %adapter.client().database_id(),
        "starting notiondeck proxy"
    );

    let state = Arc::new(ProxyState::new(adapter));

    match server::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "proxy listening");
            tracing::info!(url = %format!("http://{bound_addr}/api/health"), "health check");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "proxy server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start proxy server");
            std::process::exit(1);
        }
    }
}
