//! Category listing tool

use bangs_core::Registry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Parameters for the `get_bangs_by_category` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetBangsByCategoryParams {
    /// The category to filter by
    pub category: String,
}

/// Public view of one bang
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BangInfo {
    /// Logical name
    pub name: String,
    /// Bang token
    pub bang: String,
    /// Free-form description
    pub description: String,
    /// Free-form grouping
    pub category: String,
    /// Raw destination template
    pub url: String,
}

/// Output from `get_bangs_by_category`
#[derive(Debug, Serialize)]
pub struct CategoryOutput {
    /// Category as requested
    pub category: String,
    /// Matching bangs, ordered by name
    pub bangs: Vec<BangInfo>,
}

/// Handle `get_bangs_by_category`
///
/// Categories match case-insensitively, like `bangs list --category`.
#[tracing::instrument(skip(registry))]
pub fn handle_get_bangs_by_category(
    params: &GetBangsByCategoryParams,
    registry: &Registry,
) -> McpResult<CategoryOutput> {
    let category = params.category.trim();
    if category.is_empty() {
        return Err(McpError::InvalidParams(
            "category cannot be empty".to_string(),
        ));
    }

    let bangs: Vec<BangInfo> = registry
        .list_all_bangs()
        .values()
        .filter(|entry| entry.category.eq_ignore_ascii_case(category))
        .map(|entry| BangInfo {
            name: entry.name.clone(),
            bang: entry.bang.clone(),
            description: entry.description.clone(),
            category: entry.category.clone(),
            url: entry.url.as_str().to_string(),
        })
        .collect();

    if bangs.is_empty() {
        return Err(McpError::EmptyCategory(category.to_string()));
    }

    tracing::debug!(count = bangs.len(), "category lookup");
    Ok(CategoryOutput {
        category: category.to_string(),
        bangs,
    })
}
