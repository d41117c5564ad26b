//! bangs MCP server
//!
//! Exposes bang resolution to MCP clients: tools that build destination
//! URLs and resources that describe the loaded registry. Runs over stdio by
//! default or the streamable HTTP transport with `--http`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bangs_cli::watch::BangFileWatcher;
use bangs_core::BangsManager;
use clap::Parser;
use tracing::Level;

pub mod error;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;

const MISSING_BANG_FILE: &str = "No bangs file given; pass --bangs <FILE> or set BANGS_BANGFILE.
A starter file lives at https://raw.githubusercontent.com/dikkadev/bangs/main/bangs.yaml";

/// Command line of the `bangs-mcp` binary
#[derive(Parser, Clone, Debug)]
#[command(name = "bangs-mcp")]
#[command(version)]
#[command(about = "Model Context Protocol access to bangs search", long_about = None)]
pub struct McpCli {
    /// Path to the yaml file containing bang definitions
    #[arg(short = 'b', long = "bangs", env = "BANGS_BANGFILE")]
    pub bangs: Option<PathBuf>,

    /// Show debug logs
    #[arg(short = 'v', long, env = "BANGS_VERBOSE")]
    pub verbose: bool,

    /// Reload the bangs file when it changes
    #[arg(short = 'w', long, env = "BANGS_WATCH")]
    pub watch: bool,

    /// Serve the streamable HTTP transport instead of stdio
    #[arg(long, env = "BANGS_MCP_HTTP")]
    pub http: bool,

    /// Port to listen on (HTTP mode only)
    #[arg(short = 'p', long, env = "BANGS_MCP_PORT", default_value_t = 8081)]
    pub port: u16,
}

/// Parse the command line and run the server until the client disconnects
/// or, in HTTP mode, until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the bang file is missing or invalid, the watcher
/// cannot start, or the transport fails.
pub async fn run() -> Result<()> {
    let cli = McpCli::parse();
    initialize_logging(cli.verbose)?;
    serve(&cli).await
}

async fn serve(cli: &McpCli) -> Result<()> {
    let path = cli.bangs.clone().context(MISSING_BANG_FILE)?;
    let manager = Arc::new(
        BangsManager::load(&path)
            .with_context(|| format!("Failed to load bangs from {}", path.display()))?,
    );
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting bangs MCP server");

    let watcher = if cli.watch {
        Some(BangFileWatcher::spawn(Arc::clone(&manager))?)
    } else {
        None
    };

    let server = McpServer::new(manager);
    let outcome = if cli.http {
        server.serve_http(cli.port).await
    } else {
        server.serve_stdio().await
    };

    if let Some(watcher) = watcher {
        watcher.stop();
    }
    Ok(outcome?)
}

/// Logs always go to stderr; stdout belongs to the stdio transport.
fn initialize_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("activated debug log entries");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = McpCli::try_parse_from(["bangs-mcp", "-b", "bangs.yaml"]).unwrap();
        assert!(!cli.http);
        assert!(!cli.watch);
        assert_eq!(cli.port, 8081);
    }

    #[test]
    fn test_http_flags() {
        let cli =
            McpCli::try_parse_from(["bangs-mcp", "--http", "-p", "9090", "-w", "-v"]).unwrap();
        assert!(cli.http);
        assert!(cli.watch);
        assert!(cli.verbose);
        assert_eq!(cli.port, 9090);
    }

    #[tokio::test]
    async fn test_missing_bang_file_is_reported() {
        // Given: no bang file from flags or environment
        let cli = McpCli {
            bangs: None,
            verbose: false,
            watch: false,
            http: false,
            port: 8081,
        };

        // When/Then: startup fails before any transport opens
        let err = serve(&cli).await.unwrap_err();
        assert!(err.to_string().contains("--bangs"));
    }
}
