// crates/pulsegate-mcp/src/lib.rs
// ============================================================================
// Module: Pulsegate MCP
// Description: MCP server exposing the monitoring backend to LLM agents.
// Purpose: Provide tool routing, rendering, and transports over the gateway.
// Dependencies: pulsegate-core, pulsegate-gateway, pulsegate-config, axum, tokio
// ============================================================================

//! ## Overview
//! Pulsegate MCP exposes the monitoring backend through ten MCP tools. Tool
//! handlers compose entity resolution, concurrent signal gathering, and risk
//! classification from `pulsegate-core` with gateway fetches, and render
//! every outcome as compact text. Two transports are provided: framed stdio
//! and a stateless authenticated HTTP endpoint.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod render;
pub mod server;
pub mod signals;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::AuthAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ToolAuditEvent;
pub use audit::ToolOutcome;
pub use config::PulsegateConfig;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::RequestContext;
pub use tools::ToolContent;
pub use tools::ToolDefinition;
pub use tools::ToolResult;
pub use tools::ToolRouter;
pub use tools::tool_definitions;
