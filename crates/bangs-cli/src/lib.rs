//! bangs CLI - bang keyword redirector
//!
//! Argument parsing, logging setup and command dispatch for the `bangs`
//! binary. The HTTP service lives in [`server`] and file-watch reloads in
//! [`watch`]; both are public so integration tests can drive them directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bangs_core::Registry;
use clap::Parser;

pub mod cli;
mod commands;
pub mod server;
mod utils;
pub mod watch;

use crate::cli::{Cli, Commands};
use crate::utils::initialize_logging;

/// Execute the bangs CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized, the bang file cannot
/// be loaded, or the selected command fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    let path = bang_file(&cli)?;
    let policy = cli.policy();

    match cli.command {
        None | Some(Commands::Serve) => commands::serve(&path, cli.port, cli.watch, policy).await,
        Some(Commands::Resolve { query, format }) => {
            let registry = load(&path)?;
            commands::resolve_query(&registry, &policy, &query.join(" "), format)
        },
        Some(Commands::List { category, format }) => {
            let registry = load(&path)?;
            commands::list_bangs(&registry, category.as_deref(), format)
        },
        Some(Commands::Check) => commands::check_file(&path),
    }
}

fn bang_file(cli: &Cli) -> Result<PathBuf> {
    cli.bangs
        .clone()
        .context("No bangs file given; pass --bangs <FILE> or set BANGS_BANGFILE")
}

fn load(path: &Path) -> Result<Registry> {
    Registry::load(path).with_context(|| format!("Failed to load bangs from {}", path.display()))
}
