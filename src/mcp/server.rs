//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{McpError, Result};
use crate::mcp::tools::{ToolDescriptor, ToolHost};
use crate::mcp::types::*;

/// MCP Server info
pub const SERVER_NAME: &str = "DFR-Server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const SERVER_DESCRIPTION: &str = "MCP Server for DFR Project";

/// MCP Server dispatching to registered tools
#[derive(Debug, Default)]
pub struct McpServer {
    /// Registered tools, in registration order
    tools: Vec<ToolDescriptor>,

    /// Whether the client sent `notifications/initialized`
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server with no tools
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited JSON-RPC until `reader` reaches EOF.
    ///
    /// A line that is not UTF-8 is answered with a parse error; only
    /// transport failures end the loop.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let outcome = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    tracing::debug!(request = %line, "Received message");
                    self.handle_message(line).await
                }
                Err(e) => {
                    tracing::warn!("Received a line that is not UTF-8: {}", e);
                    Ok(Some(JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Invalid UTF-8: {}", e)),
                    )))
                }
            };

            match outcome {
                Ok(Some(response)) => {
                    let mut response_str = serde_json::to_string(&response)?;
                    response_str.push('\n');
                    writer.write_all(response_str.as_bytes()).await?;
                    writer.flush().await?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    tracing::error!("Error handling message: {}", e);
                }
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    pub async fn handle_message(&mut self, message: &str) -> Result<Option<JsonRpcResponse>> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        // Well-formed JSON that is not a request keeps whatever id it carries.
        let raw_id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return Ok(Some(JsonRpcResponse::error(
                    raw_id,
                    JsonRpcError::invalid_request(e.to_string()),
                )));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            if request.is_notification() {
                return Ok(None);
            }
            return Ok(Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported JSON-RPC version: {}",
                    request.jsonrpc
                )),
            )));
        }

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                self.initialized = true;
                tracing::info!("Client initialized");
            } else {
                tracing::debug!("Ignoring notification {}", request.method);
            }
            return Ok(None);
        }

        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = self.handle_initialize(&request)?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::PING => Ok(Some(JsonRpcResponse::success(request.id, json!({})))),
            methods::LIST_TOOLS => {
                let result = self.handle_list_tools()?;
                Ok(Some(JsonRpcResponse::success(request.id, result)))
            }
            methods::CALL_TOOL => {
                let result = self.handle_call_tool(&request).await;
                Ok(Some(JsonRpcResponse::success(
                    request.id,
                    serde_json::to_value(result)?,
                )))
            }
            _ => Ok(Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            ))),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: &JsonRpcRequest) -> Result<Value> {
        let params: InitializeParams = request
            .params
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
                "Initialize request"
            );
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
            instructions: Some(SERVER_DESCRIPTION.to_string()),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tools.iter().map(ToolDescriptor::to_tool).collect(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> CallToolResult {
        let params: CallToolParams = match request.params.clone() {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    let err = McpError::InvalidArguments {
                        message: e.to_string(),
                    };
                    return CallToolResult::error(err.to_string());
                }
            },
            None => return CallToolResult::error("Missing tool parameters"),
        };

        let Some(tool) = self.tools.iter().find(|t| t.name == params.name) else {
            let err = McpError::UnknownTool { name: params.name };
            return CallToolResult::error(err.to_string());
        };

        let args = params.arguments.unwrap_or_else(|| json!({}));
        match tool.handler.call(args).await {
            Ok(payload) => CallToolResult::json(&payload),
            Err(e) => {
                tracing::warn!(tool = %tool.name, "Tool call failed: {}", e);
                CallToolResult::error(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ToolHost for McpServer {
    fn register_tool(&mut self, descriptor: ToolDescriptor) {
        match self.tools.iter_mut().find(|t| t.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.tools.push(descriptor),
        }
    }

    async fn start(&mut self) -> Result<()> {
        self.run_stdio().await
    }
}
