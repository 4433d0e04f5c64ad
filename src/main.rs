mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use heattrail::config::HeattrailConfig;
use heattrail::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heattrail", version, about = "Navigation heat-map MCP server for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio unless --http or server.transport = "http")
    Serve {
        /// Serve streamable HTTP on server.host:server.port instead of stdio
        #[arg(long)]
        http: bool,
    },
    /// Record a note access (create, read, update, delete or list), or end the
    /// tracked session with --end
    Track {
        action: Option<String>,
        path: Option<String>,
        /// End the resumed session with this success rating (0.0-1.0)
        #[arg(long, conflicts_with_all = ["action", "path"])]
        end: Option<f64>,
    },
    /// Show the hottest resources and transitions
    Stats {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Check the heat-map document and storage root
    Doctor,
    /// Apply one heat decay pass
    Maintain,
    /// Delete the heat map and all session documents
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = HeattrailConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Track { action, path, end } => match end {
            Some(success) => cli::track::end(&config, success)?,
            None => cli::track::track(&config, action.as_deref(), path.as_deref())?,
        },
        Command::Stats { limit } => cli::stats::stats(&config, limit)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Maintain => cli::maintenance::maintain(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
