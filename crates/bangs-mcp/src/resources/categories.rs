//! Categories resource handler

use std::collections::BTreeSet;

use bangs_core::Registry;
use serde_json::json;

use crate::error::{McpError, McpResult};

/// Canonical URI of the categories resource
pub const CATEGORIES_URI: &str = "bangs://categories";

/// Handle categories resource read request
///
/// Returns the distinct non-empty categories, sorted.
#[tracing::instrument(skip(registry))]
pub fn handle_categories_resource(
    uri: &str,
    registry: &Registry,
) -> McpResult<serde_json::Value> {
    if uri != CATEGORIES_URI && uri != "resource://bangs/categories" {
        return Err(McpError::UnknownResource(uri.to_string()));
    }

    let categories: BTreeSet<&str> = registry
        .list_all_bangs()
        .values()
        .map(|entry| entry.category.as_str())
        .filter(|category| !category.is_empty())
        .collect();

    Ok(json!(categories))
}
