//! Error types for the bangs MCP server with MCP error code mapping

use rmcp::model::ErrorData;
use thiserror::Error;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    /// Loading or resolving bangs failed
    #[error("bangs error: {0}")]
    Bangs(#[from] bangs_core::Error),

    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport or handshake failure
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    /// No entry uses this bang
    #[error("bang '{0}' not found")]
    BangNotFound(String),

    /// Every bang of a multi-bang request failed
    #[error("no valid bangs found")]
    NoValidBangs,

    /// Category filter matched nothing
    #[error("no bangs found in category '{0}'")]
    EmptyCategory(String),

    /// Unknown tool name
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown resource URI
    #[error("unknown resource: {0}")]
    UnknownResource(String),
}

impl McpError {
    /// Map error to MCP error code
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Bangs(_) | Self::Internal(_) => -32603,
            Self::Json(_) => -32700,
            Self::Protocol(_) => -32600,
            Self::InvalidParams(_)
            | Self::BangNotFound(_)
            | Self::NoValidBangs
            | Self::EmptyCategory(_)
            | Self::UnknownTool(_) => -32602,
            Self::UnknownResource(_) => -32002,
        }
    }

    /// Whether the failure is an outcome of running a tool rather than a
    /// malformed request. Such failures go back as an error tool result.
    pub const fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            Self::Bangs(_) | Self::BangNotFound(_) | Self::NoValidBangs | Self::EmptyCategory(_)
        )
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<McpError> for ErrorData {
    fn from(err: McpError) -> Self {
        let message = err.to_string();
        match err {
            McpError::UnknownResource(_) => Self::resource_not_found(message, None),
            McpError::Json(_) | McpError::InvalidParams(_) | McpError::UnknownTool(_) => {
                Self::invalid_params(message, None)
            },
            _ => Self::internal_error(message, None),
        }
    }
}

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::InvalidParams("x".into()).error_code(), -32602);
        assert_eq!(McpError::BangNotFound("zz".into()).error_code(), -32602);
        assert_eq!(McpError::UnknownResource("bangs://x".into()).error_code(), -32002);
        assert_eq!(McpError::Internal("x".into()).error_code(), -32603);
    }

    #[test]
    fn test_tool_failures_stay_in_band() {
        assert!(McpError::BangNotFound("zz".into()).is_tool_failure());
        assert!(McpError::NoValidBangs.is_tool_failure());
        assert!(McpError::EmptyCategory("Misc".into()).is_tool_failure());
        assert!(!McpError::InvalidParams("x".into()).is_tool_failure());
        assert!(!McpError::UnknownTool("x".into()).is_tool_failure());
    }

    #[test]
    fn test_into_error_data() {
        let data: ErrorData = McpError::UnknownResource("bangs://nope".into()).into();
        assert!(data.message.contains("bangs://nope"));

        let data: ErrorData = McpError::UnknownTool("nope".into()).into();
        assert_eq!(data.message, "unknown tool: nope");
    }
}
