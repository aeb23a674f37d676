// crates/pulsegate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose Pulsegate tools via JSON-RPC 2.0.
// Dependencies: pulsegate-config, pulsegate-gateway, axum, tokio
// ============================================================================

//! ## Overview
//! The MCP server exposes Pulsegate tools using JSON-RPC 2.0 over two
//! transports: Content-Length framed stdio and a stateless HTTP endpoint.
//! Both route calls through [`crate::tools::ToolRouter`]. The HTTP endpoint
//! authenticates every request by validating the presented API key against
//! the backend with a bounded ping before forwarding it as the per-call
//! bearer token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use pulsegate_gateway::CallOptions;
use pulsegate_gateway::Gateway;
use pulsegate_gateway::GatewayClient;
use pulsegate_gateway::GatewayConfig;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::audit::AuditSink;
use crate::audit::AuthAuditEvent;
use crate::audit::StderrAuditSink;
use crate::audit::mask_key;
use crate::audit::timestamp_ms;
use crate::config::PulsegateConfig;
use crate::config::ServerTransport;
use crate::tools::RequestContext;
use crate::tools::ToolDefinition;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Server name reported to MCP clients.
const SERVER_NAME: &str = "pulsegate";
/// MCP protocol revision implemented by this server.
const PROTOCOL_VERSION: &str = "2024-11-05";
/// Header carrying the caller's API key on the HTTP transport.
const API_KEY_HEADER: &str = "x-api-key";
/// Timeout for the API-key validation ping against the backend.
const KEY_VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: PulsegateConfig,
    /// Tool router for request dispatch.
    router: ToolRouter,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the configuration is invalid or the
    /// gateway client cannot be constructed.
    pub fn from_config(config: PulsegateConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let gateway = GatewayClient::new(GatewayConfig {
            base_url: config.gateway.base_url.clone(),
            api_key: config.gateway.api_key.clone(),
            default_timeout_ms: config.gateway.timeout_ms,
            user_agent: format!("{SERVER_NAME}/{}", env!("CARGO_PKG_VERSION")),
        })
        .map_err(|err| McpServerError::Init(err.to_string()))?;
        let router = ToolRouter::new(Arc::new(gateway), Arc::new(StderrAuditSink));
        Ok(Self {
            config,
            router,
        })
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.config.server.transport {
            ServerTransport::Stdio => {
                serve_stdio(&self.router, self.config.server.max_body_bytes).await
            }
            ServerTransport::Http => serve_http(self.config, self.router).await,
        }
    }
}

// ============================================================================
// SECTION: JSON-RPC Envelope
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Builds a success response.
fn result_response(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

/// Builds an error response.
fn error_response(id: Value, code: i64, message: impl Into<String>) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.into(),
        }),
    }
}

/// Builds the `initialize` result payload.
fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {"tools": {}},
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
    })
}

/// Dispatches a JSON-RPC request to the tool router.
///
/// Returns `None` for notifications, which receive no response.
async fn handle_request(
    router: &ToolRouter,
    base_context: &RequestContext,
    request: JsonRpcRequest,
) -> Option<(StatusCode, JsonRpcResponse)> {
    let id = request.id?;
    if request.jsonrpc != "2.0" {
        return Some((
            StatusCode::BAD_REQUEST,
            error_response(id, -32600, "invalid json-rpc version"),
        ));
    }
    let context = base_context.clone().with_request_id(id.to_string());
    match request.method.as_str() {
        "initialize" => Some((StatusCode::OK, result_response(id, initialize_result()))),
        "ping" => Some((StatusCode::OK, result_response(id, json!({})))),
        "tools/list" => {
            let tools = router.list_tools();
            serde_json::to_value(ToolListResult {
                tools,
            })
            .map_or_else(
                |_| Some((StatusCode::OK, error_response(Value::Null, -32060, "serialization failed"))),
                |value| Some((StatusCode::OK, result_response(id, value))),
            )
        }
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => {
                    let result =
                        router.handle_tool_call(&context, &call.name, call.arguments).await;
                    match serde_json::to_value(result) {
                        Ok(value) => Some((StatusCode::OK, result_response(id, value))),
                        Err(_) => Some((
                            StatusCode::OK,
                            error_response(id, -32060, "serialization failed"),
                        )),
                    }
                }
                Err(_) => Some((
                    StatusCode::BAD_REQUEST,
                    error_response(id, -32602, "invalid tool params"),
                )),
            }
        }
        _ => Some((StatusCode::BAD_REQUEST, error_response(id, -32601, "method not found"))),
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout until the stream closes.
async fn serve_stdio(router: &ToolRouter, max_body_bytes: usize) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    loop {
        let Some(bytes) = read_framed(&mut reader, max_body_bytes).await? else {
            // Clean EOF: the client closed the stream.
            return Ok(());
        };
        let parsed: Result<JsonRpcRequest, _> = serde_json::from_slice(&bytes);
        let response = match parsed {
            Ok(request) => {
                let context = RequestContext::stdio();
                handle_request(router, &context, request).await.map(|(_, response)| response)
            }
            Err(_) => Some(error_response(Value::Null, -32600, "invalid json-rpc request")),
        };
        if let Some(response) = response {
            let payload = serde_json::to_vec(&response).map_err(|_| {
                McpServerError::Transport("json-rpc serialization failed".to_string())
            })?;
            write_framed(&mut writer, &payload).await?;
        }
    }
}

/// Reads a framed stdio payload using MCP Content-Length headers.
///
/// Returns `None` on a clean end-of-stream before any header bytes.
async fn read_framed(
    reader: &mut (impl AsyncBufRead + Unpin),
    max_body_bytes: usize,
) -> Result<Option<Vec<u8>>, McpServerError> {
    let mut content_length: Option<usize> = None;
    let mut seen_header = false;
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if read == 0 {
            if seen_header {
                return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
            }
            return Ok(None);
        }
        if line.trim().is_empty() {
            if seen_header {
                break;
            }
            continue;
        }
        seen_header = true;
        if let Some(value) = line.strip_prefix("Content-Length:") {
            let parsed = value.trim().parse::<usize>().map_err(|_| {
                McpServerError::Transport("invalid content length".to_string())
            })?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| McpServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        return Err(McpServerError::Transport("payload too large".to_string()));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(Some(buf))
}

/// Writes a framed stdio payload using MCP Content-Length headers.
async fn write_framed(
    writer: &mut (impl AsyncWrite + Unpin),
    payload: &[u8],
) -> Result<(), McpServerError> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer.flush().await.map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Shared server state for HTTP handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Gateway used for API-key validation pings.
    gateway: Arc<dyn Gateway>,
    /// Audit sink for auth failures.
    audit: Arc<dyn AuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Serves JSON-RPC requests over HTTP.
async fn serve_http(config: PulsegateConfig, router: ToolRouter) -> Result<(), McpServerError> {
    let bind = config
        .server
        .bind
        .as_ref()
        .ok_or_else(|| McpServerError::Config("bind address required".to_string()))?;
    let addr: SocketAddr =
        bind.parse().map_err(|_| McpServerError::Config("invalid bind address".to_string()))?;
    let state = Arc::new(ServerState {
        gateway: router.gateway(),
        audit: router.audit(),
        router,
        max_body_bytes: config.server.max_body_bytes,
    });
    let app = Router::new()
        .route("/mcp", post(handle_mcp).get(handle_mcp_get).delete(handle_mcp_delete))
        .route("/health", get(handle_health))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Handles health probes.
async fn handle_health() -> impl IntoResponse {
    let timestamp =
        OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| String::new());
    Json(json!({"status": "ok", "server": SERVER_NAME, "timestamp": timestamp}))
}

/// Rejects SSE subscriptions; the endpoint is stateless.
async fn handle_mcp_get() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "SSE not supported in stateless mode. Use POST /mcp"})),
    )
}

/// Rejects session termination; the endpoint is stateless.
async fn handle_mcp_delete() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Session termination not applicable in stateless mode"})),
    )
}

/// Handles HTTP JSON-RPC requests behind the API-key gate.
async fn handle_mcp(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let Some(api_key) = api_key else {
        state.audit.auth_failure(&AuthAuditEvent {
            event: "auth_failure",
            timestamp_ms: timestamp_ms(SystemTime::now()),
            peer_ip: Some(peer.ip().to_string()),
            masked_key: None,
            detail: "request without api key".to_string(),
        });
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "x-api-key header required"})),
        )
            .into_response();
    };

    // Validate the presented key against the backend with a bounded ping.
    let ping = CallOptions::authorized(Some(&api_key)).with_timeout(KEY_VALIDATION_TIMEOUT);
    let validation_query =
        vec![("page".to_string(), "1".to_string()), ("limit".to_string(), "1".to_string())];
    if let Err(err) = state.gateway.get("/monitors", &validation_query, &ping).await {
        state.audit.auth_failure(&AuthAuditEvent {
            event: "auth_failure",
            timestamp_ms: timestamp_ms(SystemTime::now()),
            peer_ip: Some(peer.ip().to_string()),
            masked_key: Some(mask_key(&api_key)),
            detail: err.to_string(),
        });
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid or expired API key"})),
        )
            .into_response();
    }

    if bytes.len() > state.max_body_bytes {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(error_response(Value::Null, -32070, "request body too large")),
        )
            .into_response();
    }
    let request: JsonRpcRequest = match serde_json::from_slice(bytes.as_ref()) {
        Ok(request) => request,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(error_response(Value::Null, -32600, "invalid json-rpc request")),
            )
                .into_response();
        }
    };
    let context = RequestContext::http(Some(peer.ip()), Some(api_key));
    match handle_request(&state.router, &context, request).await {
        Some((status, response)) => (status, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
