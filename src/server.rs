//! MCP server initialization for stdio and streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that open the engine
//! and wire it into the MCP tool handler.

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

use crate::config::HeattrailConfig;
use crate::engine::Engine;
use crate::tools::HeattrailTools;

/// Shared setup: open the engine over the configured root and wrap it for sharing.
fn setup_shared_engine(config: HeattrailConfig) -> Result<Arc<Mutex<Engine>>> {
    let root = config.resolved_root();
    let engine = Engine::open(config)
        .with_context(|| format!("failed to open heat map under {}", root.display()))?;
    tracing::info!(root = %root.display(), "heat store ready");
    Ok(Arc::new(Mutex::new(engine)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: HeattrailConfig) -> Result<()> {
    tracing::info!("starting heattrail MCP server on stdio");

    let engine = setup_shared_engine(config)?;

    let tools = HeattrailTools::new(engine);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over streamable HTTP transport.
///
/// All HTTP sessions share one engine, so there is still a single writer.
pub async fn serve_http(config: HeattrailConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting heattrail MCP server on HTTP");

    let engine = setup_shared_engine(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(HeattrailTools::new(engine.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
