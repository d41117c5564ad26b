//! bangs - bang keyword redirector
//!
//! Entry point for the `bangs` binary; everything else lives in the library.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bangs_cli::run().await
}
