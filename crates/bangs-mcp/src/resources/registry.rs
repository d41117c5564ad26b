//! Registry resource handler
//!
//! Exposes the loaded bangs via the `bangs://registry` URI.

use bangs_core::Registry;
use serde_json::json;

use crate::error::{McpError, McpResult};

/// Canonical URI of the registry resource
pub const REGISTRY_URI: &str = "bangs://registry";

/// Accepts the custom scheme and the `resource://bangs/registry` fallback
fn parse_registry_uri(uri: &str) -> McpResult<()> {
    if uri == REGISTRY_URI {
        return Ok(());
    }
    if uri == "resource://bangs/registry" {
        tracing::debug!("using fallback resource:// scheme for registry URI");
        return Ok(());
    }
    Err(McpError::UnknownResource(uri.to_string()))
}

/// Handle registry resource read request
///
/// Returns a JSON object keyed by logical name. Every value carries
/// `name`, `bang`, `url`, `description` and `category`.
#[tracing::instrument(skip(registry))]
pub fn handle_registry_resource(uri: &str, registry: &Registry) -> McpResult<serde_json::Value> {
    parse_registry_uri(uri)?;

    let bangs: serde_json::Map<String, serde_json::Value> = registry
        .list_all_bangs()
        .iter()
        .map(|(name, entry)| {
            let info = json!({
                "name": name,
                "bang": entry.bang,
                "url": entry.url.as_str(),
                "description": entry.description,
                "category": entry.category,
            });
            (name.clone(), info)
        })
        .collect();

    tracing::debug!(count = bangs.len(), "registry resource retrieved");
    Ok(serde_json::Value::Object(bangs))
}
