//! bangs-mcp - Model Context Protocol server for bangs

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bangs_mcp::run().await
}
