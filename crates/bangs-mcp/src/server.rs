//! MCP server implementation for bangs
//!
//! Each tool call and resource read takes one registry snapshot from the
//! shared [`BangsManager`], so a reload from `--watch` is visible to the next
//! request without restarting the session.

use std::net::SocketAddr;
use std::sync::Arc;

use bangs_core::{BangsManager, Registry};
use rmcp::model::{
    AnnotateAble, CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation,
    JsonObject, ListResourcesResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
    RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::{RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{McpError, McpResult};
use crate::resources::{
    CATEGORIES_URI, REGISTRY_URI, handle_categories_resource, handle_registry_resource,
};
use crate::tools::{
    ExecuteBangParams, ExecuteMultiBangParams, GetBangsByCategoryParams, handle_execute_bang,
    handle_execute_multi_bang, handle_get_bangs_by_category,
};

const EXECUTE_BANG: &str = "execute_bang";
const EXECUTE_MULTI_BANG: &str = "execute_multi_bang";
const GET_BANGS_BY_CATEGORY: &str = "get_bangs_by_category";

/// MCP server for bangs
#[derive(Clone, Debug)]
pub struct McpServer {
    manager: Arc<BangsManager>,
}

impl McpServer {
    /// Create a server over an already loaded registry
    pub const fn new(manager: Arc<BangsManager>) -> Self {
        Self { manager }
    }

    /// Serve the MCP protocol over stdio
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!("bangs MCP server starting in stdio mode");

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let service = rmcp::serve_server(self.clone(), (stdin, stdout))
            .await
            .map_err(|e| {
                tracing::error!("server initialization error: {}", e);
                McpError::Protocol(e.to_string())
            })?;

        service.waiting().await.map_err(|e| {
            tracing::error!("server runtime error: {}", e);
            McpError::Protocol(e.to_string())
        })?;

        tracing::info!("bangs MCP server stopped");
        Ok(())
    }

    /// Serve the streamable HTTP transport at `/mcp` on `0.0.0.0:<port>`
    /// until Ctrl-C
    pub async fn serve_http(&self, port: u16) -> McpResult<()> {
        let server = self.clone();
        let service = StreamableHttpService::new(
            move || Ok(server.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );
        let router = axum::Router::new().nest_service("/mcp", service);

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| McpError::Protocol(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "bangs MCP server starting in HTTP mode");
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %err, "failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            })
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        tracing::info!("bangs MCP server stopped");
        Ok(())
    }

    /// Tool definitions advertised by `tools/list`
    pub fn tools() -> Vec<Tool> {
        vec![
            Tool::new(
                EXECUTE_BANG,
                "Execute a search using a specific bang",
                input_schema::<ExecuteBangParams>(),
            ),
            Tool::new(
                EXECUTE_MULTI_BANG,
                "Execute a search using multiple bangs; unknown bangs are reported, not fatal",
                input_schema::<ExecuteMultiBangParams>(),
            ),
            Tool::new(
                GET_BANGS_BY_CATEGORY,
                "Get all bangs in a specific category",
                input_schema::<GetBangsByCategoryParams>(),
            ),
        ]
    }

    /// Resource definitions advertised by `resources/list`
    pub fn resources() -> Vec<Resource> {
        [
            (REGISTRY_URI, "bangs_registry", "Complete bangs registry"),
            (CATEGORIES_URI, "bangs_categories", "Available bang categories"),
        ]
        .into_iter()
        .map(|(uri, name, description)| {
            let mut raw = RawResource::new(uri, name);
            raw.description = Some(description.to_string());
            raw.mime_type = Some("application/json".to_string());
            raw.no_annotation()
        })
        .collect()
    }

    /// Run one tool against the current registry.
    ///
    /// Malformed calls become protocol errors; a tool that ran and failed
    /// comes back as an error result the agent can read.
    pub fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let registry = self.manager.snapshot();
        match run_tool(&registry, name, arguments) {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(err) if err.is_tool_failure() => {
                tracing::debug!(tool = name, error = %err, "tool failed");
                Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Read one resource from the current registry
    pub fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let registry = self.manager.snapshot();
        let payload = match uri {
            REGISTRY_URI | "resource://bangs/registry" => handle_registry_resource(uri, &registry),
            _ => handle_categories_resource(uri, &registry),
        }?;
        let text = serde_json::to_string_pretty(&payload).map_err(McpError::from)?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

fn run_tool(registry: &Registry, name: &str, arguments: Option<JsonObject>) -> McpResult<String> {
    match name {
        EXECUTE_BANG => to_text(&handle_execute_bang(&parse_args(arguments)?, registry)?),
        EXECUTE_MULTI_BANG => {
            to_text(&handle_execute_multi_bang(&parse_args(arguments)?, registry)?)
        },
        GET_BANGS_BY_CATEGORY => {
            to_text(&handle_get_bangs_by_category(&parse_args(arguments)?, registry)?)
        },
        other => Err(McpError::UnknownTool(other.to_string())),
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Option<JsonObject>) -> McpResult<T> {
    let value = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_text<T: Serialize>(output: &T) -> McpResult<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(schema)) => Arc::new(schema),
        _ => Arc::new(JsonObject::new()),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "bangs-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Provides access to bangs search functionality via MCP".to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(Self::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch_tool(&request.name, request.arguments)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read(&request.uri)
    }
}
