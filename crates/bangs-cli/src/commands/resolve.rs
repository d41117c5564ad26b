//! Resolve command implementation

use anyhow::{Context, Result, bail};
use bangs_core::{Forward, Registry, ResolvePolicy};
use serde::Serialize;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    query: &'a str,
    status: u16,
    urls: Vec<&'a str>,
}

/// Print where `query` would be sent by the search route.
pub fn execute(
    registry: &Registry,
    policy: &ResolvePolicy,
    query: &str,
    format: OutputFormat,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("No query provided for search");
    }

    let forward = registry
        .search(query, policy)
        .with_context(|| format!("Failed to resolve '{query}'"))?;

    match format {
        OutputFormat::Text => {
            for url in forward.urls() {
                println!("{url}");
            }
        },
        OutputFormat::Json => println!("{}", render_json(query, &forward)?),
    }
    Ok(())
}

fn render_json(query: &str, forward: &Forward) -> Result<String> {
    let resolution = Resolution {
        query,
        status: forward.status_code(),
        urls: forward.urls().iter().map(url::Url::as_str).collect(),
    };
    Ok(serde_json::to_string_pretty(&resolution)?)
}
