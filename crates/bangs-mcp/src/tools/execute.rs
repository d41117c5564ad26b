//! Bang execution tools: build destination URLs for one or several bangs

use bangs_core::{Entry, Registry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Parameters for the `execute_bang` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteBangParams {
    /// The bang to use (e.g. 'gh', 'g')
    pub bang: String,
    /// The search query
    pub query: String,
}

/// Parameters for the `execute_multi_bang` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteMultiBangParams {
    /// List of bangs to use
    pub bangs: Vec<String>,
    /// The search query
    pub query: String,
}

/// One generated destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BangResult {
    /// Bang token of the entry
    pub bang: String,
    /// Logical name of the entry
    pub name: String,
    /// Destination with the query substituted
    pub url: String,
}

/// Output from `execute_multi_bang`
#[derive(Debug, Serialize)]
pub struct MultiBangOutput {
    /// Destinations for every bang that resolved
    pub results: Vec<BangResult>,
    /// One message per bang that did not
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn validate_query(query: &str) -> McpResult<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(McpError::InvalidParams("query cannot be empty".to_string()));
    }
    Ok(query)
}

fn generate(entry: &Entry, query: &str) -> bangs_core::Result<BangResult> {
    let url = entry.url.augment(query)?;
    Ok(BangResult {
        bang: entry.bang.clone(),
        name: entry.name.clone(),
        url: url.to_string(),
    })
}

/// Handle `execute_bang`
#[tracing::instrument(skip(registry))]
pub fn handle_execute_bang(
    params: &ExecuteBangParams,
    registry: &Registry,
) -> McpResult<BangResult> {
    let query = validate_query(&params.query)?;
    let bang = params.bang.trim();
    let entry = registry
        .bangs()
        .lookup(bang)
        .ok_or_else(|| McpError::BangNotFound(bang.to_string()))?;

    let result = generate(entry, query)?;
    tracing::debug!(url = %result.url, "generated url");
    Ok(result)
}

/// Handle `execute_multi_bang`
///
/// Bangs that are unknown or whose template rejects the query are reported
/// in `errors`; the call only fails when none of them resolve.
#[tracing::instrument(skip(registry))]
pub fn handle_execute_multi_bang(
    params: &ExecuteMultiBangParams,
    registry: &Registry,
) -> McpResult<MultiBangOutput> {
    let query = validate_query(&params.query)?;
    if params.bangs.is_empty() {
        return Err(McpError::InvalidParams(
            "at least one bang must be provided".to_string(),
        ));
    }

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for raw in &params.bangs {
        let bang = raw.trim();
        let Some(entry) = registry.bangs().lookup(bang) else {
            errors.push(format!("Bang '{bang}' not found"));
            continue;
        };
        match generate(entry, query) {
            Ok(result) => results.push(result),
            Err(err) => errors.push(format!("Error generating URL for bang '{bang}': {err}")),
        }
    }

    if results.is_empty() {
        return Err(McpError::NoValidBangs);
    }
    tracing::debug!(ok = results.len(), failed = errors.len(), "multi-bang done");
    Ok(MultiBangOutput { results, errors })
}
