use anyhow::Result;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool, ToolAnnotations,
    },
    service::RequestContext,
    transport::stdio,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::metadata::{GET_DOC, GetDocArgs, ToolMetadata, all_tool_metadata};
use crate::error::Envelope;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::lookup::DocLookup;
use crate::search::{SearchProvider, SerperClient};

/// MCP server exposing the `get_doc` tool over stdio
pub struct DocsServer<S = SerperClient, F = HttpPageFetcher> {
    lookup: Arc<DocLookup<S, F>>,

    /// Tool metadata, built once from the catalog
    tools: Vec<ToolMetadata>,
}

impl<S, F> DocsServer<S, F>
where
    S: SearchProvider + Send + Sync + 'static,
    F: PageFetcher + Send + Sync + 'static,
{
    pub fn new(lookup: DocLookup<S, F>) -> Self {
        let tools = all_tool_metadata(lookup.catalog());
        Self {
            lookup: Arc::new(lookup),
            tools,
        }
    }

    /// Serve the stdio transport until the host disconnects or `shutdown` fires
    pub async fn serve_stdio(self, shutdown: CancellationToken) -> Result<()> {
        log::info!(
            "Starting stdio server with {} catalogued libraries",
            self.lookup.catalog().len()
        );

        let service = self.serve(stdio()).await.inspect_err(|e| {
            log::error!("serving error: {e:?}");
        })?;

        tokio::select! {
            quit = service.waiting() => {
                let reason = quit?;
                log::info!("Stdio server stopped: {reason:?}");
            }
            () = shutdown.cancelled() => {
                log::info!("Shutdown requested, stopping stdio server");
            }
        }

        Ok(())
    }

    /// Execute a tool call by name. Protocol errors are reserved for unknown
    /// tools and malformed arguments; lookup failures come back as error
    /// envelopes.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        if name != GET_DOC {
            return Err(McpError::invalid_params(
                format!("Unknown tool: {name}"),
                None,
            ));
        }

        let args = parse_arguments(arguments)?;
        log::debug!(
            "get_doc(query={:?}, library={:?})",
            args.query,
            args.library
        );

        let envelope = self.lookup.get_doc(&args.query, &args.library).await;
        envelope_to_result(&envelope)
    }

    fn list(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool_meta| {
                // Convert schema Value to Arc<JsonObject>
                let schema_obj = match tool_meta.schema.clone() {
                    serde_json::Value::Object(obj) => Arc::new(obj),
                    _ => Arc::new(serde_json::Map::new()),
                };

                Tool {
                    name: tool_meta.name.into(),
                    title: None,
                    description: Some(tool_meta.description.clone().into()),
                    input_schema: schema_obj,
                    output_schema: None,
                    annotations: Some(ToolAnnotations {
                        title: None,
                        read_only_hint: Some(true),
                        destructive_hint: Some(false),
                        idempotent_hint: Some(true),
                        open_world_hint: Some(true),
                    }),
                    icons: None,
                    meta: None,
                }
            })
            .collect()
    }
}

fn parse_arguments(arguments: Option<JsonObject>) -> Result<GetDocArgs, McpError> {
    let args = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(args).map_err(|e| {
        McpError::invalid_params(format!("Invalid arguments for {GET_DOC}: {e}"), None)
    })
}

/// Render an envelope as tool output; error envelopes set `is_error`
fn envelope_to_result<T: Serialize>(envelope: &Envelope<T>) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(envelope).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize response: {e}"), None)
    })?;

    if envelope.is_error() {
        Ok(CallToolResult::error(vec![Content::text(text)]))
    } else {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl<S, F> ServerHandler for DocsServer<S, F>
where
    S: SearchProvider + Send + Sync + 'static,
    F: PageFetcher + Send + Sync + 'static,
{
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Documentation lookup server - use get_doc to search a supported library's documentation site".to_string(),
            ),
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.list();
        log::debug!("Serving {} tools from static metadata", tools.len());
        Ok(ListToolsResult::with_all_items(tools))
    }
}
