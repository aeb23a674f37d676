// crates/pulsegate-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool routing and handlers for the Pulsegate MCP server.
// Purpose: Translate tool calls into gateway requests and compact text.
// Dependencies: pulsegate-core, pulsegate-gateway, serde_json, tokio
// ============================================================================

//! ## Overview
//! The tool router dispatches MCP tool calls to their handlers. Handlers
//! compose entity resolution, gateway fetches, and text rendering; they are
//! infallible by construction: every failure path terminates in a
//! [`ToolResult`], either an advisory message the agent can act on
//! (resolution misses, missing arguments) or an error-flagged envelope
//! carrying the gateway failure text. The calling agent never sees a
//! transport error for a data problem.
//!
//! ## Invariants
//! - Resolution ambiguity and not-found outcomes are advisory text, never
//!   error envelopes.
//! - Gateway failures during resolution lookups, direct fetches, and
//!   analysis generation become `isError` envelopes.
//! - Handlers hold no state across invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use pulsegate_core::HealthReport;
use pulsegate_core::Incident;
use pulsegate_core::Monitor;
use pulsegate_core::MonitorId;
use pulsegate_core::Prediction;
use pulsegate_core::Rca;
use pulsegate_core::Resolution;
use pulsegate_core::Service;
use pulsegate_core::ServiceId;
use pulsegate_core::ToolName;
use pulsegate_core::classify;
use pulsegate_core::model::ExecutiveSummary;
use pulsegate_core::model::MonitorMetricsSummary;
use pulsegate_core::model::OperationalStatus;
use pulsegate_core::normalize_confidence;
use pulsegate_core::resolve;
use pulsegate_core::risk::GENERIC_TARGET_LABEL;
use pulsegate_gateway::CallOptions;
use pulsegate_gateway::Gateway;
use pulsegate_gateway::GatewayError;
use pulsegate_gateway::decode;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;

use crate::audit::AuditSink;
use crate::audit::ToolAuditEvent;
use crate::audit::ToolOutcome;
use crate::audit::timestamp_ms;
use crate::config::ServerTransport;
use crate::render;
use crate::signals;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default minimum prediction confidence for `get_predictions`.
const DEFAULT_MIN_CONFIDENCE: f64 = 60.0;
/// Default look-back window in hours for incident and deployment tools.
const DEFAULT_LOOKBACK_HOURS: f64 = 24.0;
/// Default period in hours for executive summaries.
const DEFAULT_SUMMARY_HOURS: f64 = 12.0;
/// Default response language forwarded to the backend.
const DEFAULT_LANGUAGE: &str = "es";
/// Default analysis depth tier forwarded to the backend.
const DEFAULT_TIER: &str = "standard";
/// Page size requested for the incident list.
const INCIDENT_PAGE_LIMIT: &str = "10";
/// Page size requested for the deployment list.
const DEPLOYMENT_PAGE_LIMIT: &str = "20";
/// Page size requested for the monitor list.
const MONITOR_PAGE_LIMIT: &str = "100";
/// Number of incidents enriched with root-cause lookups.
const RCA_LOOKUP_LIMIT: usize = 5;
/// Timeout for analysis generation; the backend call is long-running.
const RCA_GENERATION_TIMEOUT: Duration = Duration::from_secs(300);
/// Timeout for executive summary generation.
const SUMMARY_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request context passed from a transport front-end to the router.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport the request arrived on.
    pub transport: ServerTransport,
    /// Peer IP address when the transport knows one.
    pub peer_ip: Option<IpAddr>,
    /// JSON-RPC request identifier for audit correlation.
    pub request_id: Option<String>,
    /// Bearer token forwarded to the gateway for per-caller auth.
    pub auth_token: Option<String>,
}

impl RequestContext {
    /// Creates a context for the stdio transport.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
            request_id: None,
            auth_token: None,
        }
    }

    /// Creates a context for the HTTP transport.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>, auth_token: Option<String>) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip,
            request_id: None,
            auth_token,
        }
    }

    /// Attaches the JSON-RPC request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

// ============================================================================
// SECTION: Tool Results
// ============================================================================

/// Content block inside a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Plain text content.
    Text {
        /// The rendered text.
        text: String,
    },
}

/// Tool call result envelope.
///
/// Errors are reported inside the envelope with `isError: true`, never as a
/// transport-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Result content blocks.
    pub content: Vec<ToolContent>,
    /// Set when the result describes a failure.
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// Creates a plain text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: text.into(),
            }],
            is_error: None,
        }
    }

    /// Creates an error-flagged result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Returns the first text block, when present.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().map(|ToolContent::Text { text }| text.as_str()).next()
    }

    /// Returns the total rendered size in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.content.iter().map(|ToolContent::Text { text }| text.len()).sum()
    }
}

// ============================================================================
// SECTION: Tool Definitions
// ============================================================================

/// Tool definition shape used by MCP tool listings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Builds one tool definition.
fn definition(name: ToolName, description: &str, properties: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
        }),
    }
}

/// Returns the canonical MCP tool definitions.
///
/// The order is intentional: it is preserved in tool listings to keep
/// client-side diffs stable. Append new tools at the end.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition(
            ToolName::GetServiceStatus,
            "Get the current health status of a service or all services. Returns health score, \
             monitor status, and active incidents.",
            json!({
                "service_id": {"type": "string", "description": "UUID of the service. Omit to get all services."},
                "service_name": {"type": "string", "description": "Name of the service (fuzzy match). Alternative to service_id."},
            }),
        ),
        definition(
            ToolName::GetPredictions,
            "Get active AI predictions for monitors or services. Shows predicted problems with \
             confidence levels.",
            json!({
                "service_id": {"type": "string", "description": "Filter predictions by service UUID."},
                "monitor_id": {"type": "string", "description": "Filter predictions by monitor UUID."},
                "min_confidence": {"type": "number", "description": "Minimum confidence threshold (0-100). Default: 60."},
            }),
        ),
        definition(
            ToolName::GetIncidents,
            "Get incidents with optional filters. Includes root cause analysis if available.",
            json!({
                "service_id": {"type": "string", "description": "Filter incidents by service UUID."},
                "monitor_id": {"type": "string", "description": "Filter incidents by monitor UUID."},
                "status": {
                    "type": "string",
                    "enum": ["active", "resolved", "detecting", "investigating", "identified", "resolving", "monitoring", "all"],
                    "description": "Filter by status. 'active' = all non-resolved. Default: active.",
                },
                "hours": {"type": "number", "description": "Look back N hours. Default: 24."},
                "include_rca": {"type": "boolean", "description": "Include root cause analysis details. Default: true."},
            }),
        ),
        definition(
            ToolName::GetMonitorHealth,
            "Get detailed health information for a specific monitor including response time, \
             uptime, and active predictions.",
            json!({
                "monitor_id": {"type": "string", "description": "UUID of the monitor."},
                "monitor_name": {"type": "string", "description": "Name of the monitor (fuzzy match). Alternative to monitor_id."},
                "period": {
                    "type": "string",
                    "enum": ["1h", "6h", "24h", "7d", "30d"],
                    "description": "Time period for statistics. Default: 24h.",
                },
            }),
        ),
        definition(
            ToolName::GetDeployments,
            "Get recent deployments and their correlation with incidents. Shows which deploys \
             potentially caused issues.",
            json!({
                "service_id": {"type": "string", "description": "Filter deployments by service UUID."},
                "hours": {"type": "number", "description": "Look back N hours. Default: 24."},
                "include_correlations": {"type": "boolean", "description": "Include incident correlations. Default: true."},
            }),
        ),
        definition(
            ToolName::RunRootCauseAnalysis,
            "Run an AI-powered root cause analysis for an incident or service. Analyzes \
             dependencies, cascading failures, and deployment correlations.",
            json!({
                "incident_id": {"type": "string", "description": "UUID of the incident to analyze."},
                "service_id": {"type": "string", "description": "UUID of the service to analyze (alternative to incident_id)."},
                "language": {"type": "string", "enum": ["es", "en"], "description": "Response language. Default: es."},
                "tier": {
                    "type": "string",
                    "enum": ["basic", "standard", "deep", "premium"],
                    "description": "Analysis depth tier. Default: standard.",
                },
            }),
        ),
        definition(
            ToolName::IsSafeToDeploy,
            "Check if it's safe to deploy right now based on current service health, active \
             predictions, and recent incidents. Useful for CI/CD pipeline integration.",
            json!({
                "service_id": {"type": "string", "description": "UUID of the service to check."},
                "service_name": {"type": "string", "description": "Name of the service (fuzzy match)."},
            }),
        ),
        definition(
            ToolName::GetExecutiveSummary,
            "Get an executive summary of infrastructure health for a time period. Ideal for \
             daily standups, weekly reports, or status updates.",
            json!({
                "hours": {"type": "number", "description": "Period to summarize in hours. Default: 12."},
                "language": {"type": "string", "enum": ["es", "en"], "description": "Response language. Default: es."},
            }),
        ),
        definition(
            ToolName::GetMonitors,
            "List all monitors with optional filtering by status or type. Returns name, URL, \
             operational status, response time, and uptime for each monitor.",
            json!({
                "status": {
                    "type": "string",
                    "enum": ["all", "up", "down", "degraded", "paused", "maintenance", "active"],
                    "description": "Filter by status. 'up/down/degraded' filter by operational status, 'paused/maintenance/active' by admin status. Default: all.",
                },
                "type": {
                    "type": "string",
                    "enum": ["http", "tcp", "dns", "database", "email", "synthetic", "push", "ping"],
                    "description": "Filter by monitor type.",
                },
            }),
        ),
        definition(
            ToolName::GetMonitorMetrics,
            "Get detailed metrics summary for a specific monitor including response time stats, \
             uptime percentage, and error breakdown.",
            json!({
                "monitor_id": {"type": "string", "description": "UUID of the monitor."},
                "monitor_name": {"type": "string", "description": "Name of the monitor (fuzzy match). Alternative to monitor_id."},
            }),
        ),
    ]
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Arguments naming a service by id or fuzzy name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServiceTargetRequest {
    /// Service identifier.
    service_id: Option<String>,
    /// Service name for fuzzy resolution.
    service_name: Option<String>,
}

/// Arguments for `get_predictions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictionsRequest {
    /// Restrict to one service.
    service_id: Option<String>,
    /// Restrict to one monitor.
    monitor_id: Option<String>,
    /// Minimum normalized confidence to include.
    min_confidence: Option<f64>,
}

/// Arguments for `get_incidents`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncidentsRequest {
    /// Restrict to one service.
    service_id: Option<String>,
    /// Restrict to one monitor.
    monitor_id: Option<String>,
    /// Status filter; `active` and `all` are virtual client-side filters.
    status: Option<String>,
    /// Look-back window in hours.
    hours: Option<f64>,
    /// Whether to attach root-cause analyses.
    include_rca: Option<bool>,
}

/// Arguments for `get_monitor_health`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MonitorHealthRequest {
    /// Monitor identifier.
    monitor_id: Option<String>,
    /// Monitor name for fuzzy resolution.
    monitor_name: Option<String>,
    /// Statistics period forwarded to the backend.
    period: Option<String>,
}

/// Arguments for `get_deployments`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeploymentsRequest {
    /// Restrict to one service.
    service_id: Option<String>,
    /// Look-back window in hours.
    hours: Option<f64>,
    /// Whether to render incident correlations.
    include_correlations: Option<bool>,
}

/// Arguments for `run_root_cause_analysis`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcaRequest {
    /// Incident to analyze.
    incident_id: Option<String>,
    /// Service to analyze when no incident is named.
    service_id: Option<String>,
    /// Response language forwarded to the backend.
    language: Option<String>,
    /// Analysis depth tier forwarded to the backend.
    tier: Option<String>,
}

/// Arguments for `get_executive_summary`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryRequest {
    /// Period to summarize in hours.
    hours: Option<f64>,
    /// Response language forwarded to the backend.
    language: Option<String>,
}

/// Arguments for `get_monitors`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MonitorsRequest {
    /// Status filter; admin statuses pass through, operational ones filter
    /// client-side.
    status: Option<String>,
    /// Monitor type filter passed through to the backend.
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Arguments for `get_monitor_metrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MonitorMetricsRequest {
    /// Monitor identifier.
    monitor_id: Option<String>,
    /// Monitor name for fuzzy resolution.
    monitor_name: Option<String>,
}

/// Backend monitor list shapes: a plain array or wrapped under `monitors`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MonitorsPayload {
    /// Plain array of monitors.
    List(Vec<Monitor>),
    /// Object wrapping the list under a `monitors` key.
    Wrapped {
        /// The wrapped monitor list.
        monitors: Vec<Monitor>,
    },
}

impl MonitorsPayload {
    /// Unwraps to the monitor list regardless of wire shape.
    fn into_monitors(self) -> Vec<Monitor> {
        match self {
            Self::List(monitors)
            | Self::Wrapped {
                monitors,
            } => monitors,
        }
    }
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
#[derive(Clone)]
pub struct ToolRouter {
    /// Gateway used for all backend access.
    gateway: Arc<dyn Gateway>,
    /// Audit sink for tool invocations.
    audit: Arc<dyn AuditSink>,
}

impl ToolRouter {
    /// Creates a new tool router.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            gateway,
            audit,
        }
    }

    /// Returns the gateway shared with transport front-ends.
    #[must_use]
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Returns the audit sink shared with transport front-ends.
    #[must_use]
    pub fn audit(&self) -> Arc<dyn AuditSink> {
        Arc::clone(&self.audit)
    }

    /// Lists the MCP tools supported by this server.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Handles a tool call by name with JSON arguments.
    ///
    /// Always returns a [`ToolResult`]; unknown tools and argument decode
    /// failures become error-flagged envelopes.
    pub async fn handle_tool_call(
        &self,
        context: &RequestContext,
        name: &str,
        arguments: Value,
    ) -> ToolResult {
        let started = Instant::now();
        let tool = ToolName::parse(name);
        let result = match tool {
            Some(tool) => self.dispatch(tool, arguments, context.auth_token.as_deref()).await,
            None => ToolResult::error(format!("Unknown tool: {name}")),
        };
        let outcome =
            if result.is_error.unwrap_or(false) { ToolOutcome::Error } else { ToolOutcome::Ok };
        self.audit.tool_call(&ToolAuditEvent {
            event: "tool_call",
            timestamp_ms: timestamp_ms(SystemTime::now()),
            request_id: context.request_id.clone(),
            transport: context.transport,
            peer_ip: context.peer_ip.map(|ip| ip.to_string()),
            tool: tool.map(|tool| tool.as_str().to_string()),
            outcome,
            duration_ms: started.elapsed().as_millis(),
            response_bytes: result.byte_len(),
        });
        result
    }

    /// Dispatches a parsed tool name to its handler.
    async fn dispatch(&self, tool: ToolName, arguments: Value, auth: Option<&str>) -> ToolResult {
        match tool {
            ToolName::GetServiceStatus => match decode_args(arguments) {
                Ok(args) => self.handle_get_service_status(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetPredictions => match decode_args(arguments) {
                Ok(args) => self.handle_get_predictions(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetIncidents => match decode_args(arguments) {
                Ok(args) => self.handle_get_incidents(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetMonitorHealth => match decode_args(arguments) {
                Ok(args) => self.handle_get_monitor_health(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetDeployments => match decode_args(arguments) {
                Ok(args) => self.handle_get_deployments(args, auth).await,
                Err(result) => result,
            },
            ToolName::RunRootCauseAnalysis => match decode_args(arguments) {
                Ok(args) => self.handle_run_root_cause_analysis(args, auth).await,
                Err(result) => result,
            },
            ToolName::IsSafeToDeploy => match decode_args(arguments) {
                Ok(args) => self.handle_is_safe_to_deploy(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetExecutiveSummary => match decode_args(arguments) {
                Ok(args) => self.handle_get_executive_summary(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetMonitors => match decode_args(arguments) {
                Ok(args) => self.handle_get_monitors(args, auth).await,
                Err(result) => result,
            },
            ToolName::GetMonitorMetrics => match decode_args(arguments) {
                Ok(args) => self.handle_get_monitor_metrics(args, auth).await,
                Err(result) => result,
            },
        }
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    /// Handles `get_service_status`.
    async fn handle_get_service_status(
        &self,
        args: ServiceTargetRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let options = CallOptions::authorized(auth);
        if let Some(service_id) = trimmed(args.service_id.as_deref()) {
            let service_path = format!("/services/{service_id}");
            let health_path = format!("/services/{service_id}/health");
            let (service_result, health_result) = tokio::join!(
                self.gateway.get(&service_path, &[], &options),
                self.gateway.get(&health_path, &[], &options),
            );
            let mut service: Service = match service_result.and_then(decode) {
                Ok(service) => service,
                Err(err) => return gateway_error(&err),
            };
            if let Ok(report) = health_result.and_then(decode::<HealthReport>)
                && report.health_score.is_some()
            {
                service.health_score = report.health_score;
            }
            return ToolResult::text(render::render_service_status(&service));
        }

        let services = match self.fetch_services(auth).await {
            Ok(services) => services,
            Err(err) => return gateway_error(&err),
        };

        if let Some(name) = trimmed(args.service_name.as_deref()) {
            return match resolve(&services, name) {
                Resolution::Resolved(service) => {
                    let mut service = service.clone();
                    let health = self.fetch_health(&service.id, auth).await;
                    if health.is_some() {
                        service.health_score = health;
                    }
                    ToolResult::text(render::render_service_status(&service))
                }
                Resolution::Ambiguous(candidates) => {
                    ToolResult::text(ambiguous_services_message(name, &candidates))
                }
                Resolution::NotFound => {
                    ToolResult::text(format!("No service found matching \"{name}\"."))
                }
            };
        }

        ToolResult::text(render::render_service_list(&services))
    }

    /// Handles `get_predictions`.
    async fn handle_get_predictions(
        &self,
        args: PredictionsRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let options = CallOptions::authorized(auth);
        let fetched = if let Some(monitor_id) = trimmed(args.monitor_id.as_deref()) {
            self.gateway.get(&format!("/monitors/{monitor_id}/predictions"), &[], &options).await
        } else {
            self.gateway.get("/predictive/alerts", &[], &options).await
        };
        let payload = match fetched {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        // Non-list payloads render as an empty prediction set.
        let mut predictions: Vec<Prediction> = decode(payload).unwrap_or_default();

        let min_confidence = args.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE);
        predictions.retain(|prediction| {
            prediction.confidence.map_or(0.0, normalize_confidence) >= min_confidence
        });
        if let Some(service_id) = trimmed(args.service_id.as_deref()) {
            let service = ServiceId::new(service_id);
            predictions.retain(|prediction| prediction.service_id.as_ref() == Some(&service));
        }
        predictions.retain(Prediction::is_active);

        ToolResult::text(render::render_predictions(&predictions))
    }

    /// Handles `get_incidents`.
    async fn handle_get_incidents(&self, args: IncidentsRequest, auth: Option<&str>) -> ToolResult {
        let options = CallOptions::authorized(auth);
        let mut query = vec![("limit".to_string(), INCIDENT_PAGE_LIMIT.to_string())];
        if let Some(monitor_id) = trimmed(args.monitor_id.as_deref()) {
            query.push(("monitorId".to_string(), monitor_id.to_string()));
        }
        // "active" is a virtual status meaning non-resolved; "all" disables
        // filtering. Neither is passed to the backend.
        let status = trimmed(args.status.as_deref()).unwrap_or("active");
        if status != "all" && status != "active" {
            query.push(("status".to_string(), status.to_string()));
        }

        let payload = match self.gateway.get("/incidents", &query, &options).await {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        let incidents: Vec<Incident> = decode(payload).unwrap_or_default();
        if incidents.is_empty() {
            return ToolResult::text("No incidents found.");
        }

        let now = OffsetDateTime::now_utc();
        let hours = args.hours.unwrap_or(DEFAULT_LOOKBACK_HOURS);
        let cutoff = now - time::Duration::seconds_f64(hours * 3600.0);
        let mut filtered: Vec<Incident> = incidents
            .into_iter()
            .filter(|incident| incident.started_at().is_some_and(|started| started >= cutoff))
            .collect();
        if status == "active" {
            filtered.retain(Incident::is_active);
        }
        if let Some(service_id) = trimmed(args.service_id.as_deref()) {
            let service = ServiceId::new(service_id);
            filtered.retain(|incident| incident.affects_service(&service));
        }

        let mut rcas: BTreeMap<String, Rca> = BTreeMap::new();
        if args.include_rca.unwrap_or(true) && !filtered.is_empty() {
            let mut lookups = Vec::new();
            for incident in filtered.iter().take(RCA_LOOKUP_LIMIT) {
                let gateway = Arc::clone(&self.gateway);
                let options = CallOptions::authorized(auth);
                let incident_id = incident.id.clone();
                lookups.push(tokio::spawn(async move {
                    let payload = gateway
                        .get(&format!("/rca/incident/{incident_id}"), &[], &options)
                        .await
                        .ok()?;
                    extract_rca(payload).map(|rca| (incident_id.as_str().to_string(), rca))
                }));
            }
            for lookup in lookups {
                // A failed lookup just means no analysis for that incident.
                if let Ok(Some((incident_id, rca))) = lookup.await {
                    rcas.insert(incident_id, rca);
                }
            }
        }

        ToolResult::text(render::render_incidents(&filtered, &rcas, now))
    }

    /// Handles `get_monitor_health`.
    async fn handle_get_monitor_health(
        &self,
        args: MonitorHealthRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let target = match self
            .resolve_monitor_target(args.monitor_id.as_deref(), args.monitor_name.as_deref(), auth)
            .await
        {
            Ok(target) => target,
            Err(result) => return result,
        };
        let options = CallOptions::authorized(auth);
        let monitor_query: Vec<(String, String)> = trimmed(args.period.as_deref())
            .map(|period| vec![("period".to_string(), period.to_string())])
            .unwrap_or_default();
        let monitor_path = format!("/monitors/{target}");
        let predictions_path = format!("/monitors/{target}/predictions");
        let (monitor_result, predictions_result) = tokio::join!(
            self.gateway.get(&monitor_path, &monitor_query, &options),
            self.gateway.get(&predictions_path, &[], &options),
        );
        let monitor: Monitor = match monitor_result.and_then(decode) {
            Ok(monitor) => monitor,
            Err(err) => return gateway_error(&err),
        };
        let predictions: Vec<Prediction> = predictions_result
            .ok()
            .and_then(|payload| decode(payload).ok())
            .unwrap_or_default();
        let active: Vec<Prediction> =
            predictions.into_iter().filter(Prediction::is_active).collect();
        ToolResult::text(render::render_monitor_health(&monitor, &active))
    }

    /// Handles `get_deployments`.
    async fn handle_get_deployments(
        &self,
        args: DeploymentsRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let options = CallOptions::authorized(auth);
        let query = vec![("limit".to_string(), DEPLOYMENT_PAGE_LIMIT.to_string())];
        let payload = match self.gateway.get("/deployments", &query, &options).await {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        let deployments: Vec<pulsegate_core::Deployment> = decode(payload).unwrap_or_default();
        if deployments.is_empty() {
            return ToolResult::text("No recent deployments.");
        }

        let now = OffsetDateTime::now_utc();
        let hours = args.hours.unwrap_or(DEFAULT_LOOKBACK_HOURS);
        let cutoff = now - time::Duration::seconds_f64(hours * 3600.0);
        let mut filtered: Vec<pulsegate_core::Deployment> = deployments
            .into_iter()
            .filter(|deployment| {
                deployment.deployed_at.is_some_and(|deployed| deployed >= cutoff)
            })
            .collect();
        if let Some(service_id) = trimmed(args.service_id.as_deref()) {
            let service = ServiceId::new(service_id);
            filtered.retain(|deployment| deployment.service_id.as_ref() == Some(&service));
        }
        if !args.include_correlations.unwrap_or(true) {
            for deployment in &mut filtered {
                deployment.correlations.clear();
            }
        }

        ToolResult::text(render::render_deployments(&filtered, now))
    }

    /// Handles `run_root_cause_analysis`.
    async fn handle_run_root_cause_analysis(
        &self,
        args: RcaRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let incident_id = trimmed(args.incident_id.as_deref());
        let service_id = trimmed(args.service_id.as_deref());
        if incident_id.is_none() && service_id.is_none() {
            return ToolResult::text("Please provide either incident_id or service_id.");
        }

        let options = CallOptions::authorized(auth);
        if let Some(incident_id) = incident_id {
            // A failed existence check falls through to a fresh analysis.
            if let Ok(payload) =
                self.gateway.get(&format!("/rca/incident/{incident_id}"), &[], &options).await
                && let Some(rca) = extract_rca(payload)
            {
                return ToolResult::text(format!(
                    "[CACHED] Existing RCA found:\n\n{}",
                    render::render_rca(&rca)
                ));
            }
        }

        let mut body = serde_json::Map::new();
        body.insert(
            "language".to_string(),
            json!(args.language.as_deref().map_or(DEFAULT_LANGUAGE, str::trim)),
        );
        body.insert(
            "tier".to_string(),
            json!(args.tier.as_deref().map_or(DEFAULT_TIER, str::trim)),
        );
        if let Some(incident_id) = incident_id {
            body.insert("incidentId".to_string(), json!(incident_id));
        }
        if let Some(service_id) = service_id {
            body.insert("serviceId".to_string(), json!(service_id));
        }

        let options = options.with_timeout(RCA_GENERATION_TIMEOUT);
        let payload = match self
            .gateway
            .post("/rca/analyze", Some(Value::Object(body)), &options)
            .await
        {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        let rca: Rca = match decode(payload) {
            Ok(rca) => rca,
            Err(err) => return gateway_error(&err),
        };
        ToolResult::text(format!("[NEW] RCA generated:\n\n{}", render::render_rca(&rca)))
    }

    /// Handles `is_safe_to_deploy`.
    async fn handle_is_safe_to_deploy(
        &self,
        args: ServiceTargetRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let mut service_id = trimmed(args.service_id.as_deref()).map(ServiceId::new);
        let mut target_label = GENERIC_TARGET_LABEL.to_string();

        if service_id.is_none()
            && let Some(name) = trimmed(args.service_name.as_deref())
        {
            let services = match self.fetch_services(auth).await {
                Ok(services) => services,
                Err(err) => return gateway_error(&err),
            };
            match resolve(&services, name) {
                Resolution::Resolved(service) => {
                    service_id = Some(service.id.clone());
                    target_label = service.name.clone();
                }
                Resolution::Ambiguous(candidates) => {
                    return ToolResult::text(ambiguous_services_message(name, &candidates));
                }
                Resolution::NotFound => {
                    return ToolResult::text(format!("No service found matching \"{name}\"."));
                }
            }
        }

        let signals = signals::gather(self.gateway.as_ref(), service_id.as_ref(), auth).await;
        let verdict = classify(&signals, &target_label);
        ToolResult::text(render::render_safety_check(&verdict))
    }

    /// Handles `get_executive_summary`.
    async fn handle_get_executive_summary(
        &self,
        args: SummaryRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let hours = args.hours.unwrap_or(DEFAULT_SUMMARY_HOURS);
        let language = args.language.as_deref().map_or(DEFAULT_LANGUAGE, str::trim);
        let query = vec![
            ("hours".to_string(), format!("{hours}")),
            ("language".to_string(), language.to_string()),
        ];
        let options = CallOptions::authorized(auth).with_timeout(SUMMARY_TIMEOUT);
        let payload = match self.gateway.get("/executive-summary", &query, &options).await {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        let summary: ExecutiveSummary = match decode(payload) {
            Ok(summary) => summary,
            Err(err) => return gateway_error(&err),
        };
        ToolResult::text(render::render_executive_summary(&summary))
    }

    /// Handles `get_monitors`.
    async fn handle_get_monitors(&self, args: MonitorsRequest, auth: Option<&str>) -> ToolResult {
        let mut query = vec![("limit".to_string(), MONITOR_PAGE_LIMIT.to_string())];
        if let Some(kind) = trimmed(args.kind.as_deref()) {
            query.push(("type".to_string(), kind.to_string()));
        }
        // The backend's status param filters by administrative status only;
        // operational statuses filter client-side after fetching everything.
        let status = trimmed(args.status.as_deref());
        if let Some(status @ ("active" | "paused" | "maintenance")) = status {
            query.push(("status".to_string(), status.to_string()));
        }

        let monitors = match self.fetch_monitors(&query, auth).await {
            Ok(monitors) => monitors,
            Err(err) => return gateway_error(&err),
        };

        let filtered: Vec<Monitor> = match status {
            Some(operational @ ("up" | "down" | "degraded")) => monitors
                .into_iter()
                .filter(|monitor| {
                    monitor
                        .operational_status
                        .map_or_else(|| monitor.status.as_str(), OperationalStatus::as_str)
                        == operational
                })
                .collect(),
            _ => monitors,
        };

        if filtered.is_empty() {
            let qualifier = status
                .filter(|status| *status != "all")
                .map_or_else(String::new, |status| format!(" with status \"{status}\""));
            return ToolResult::text(format!("No monitors found{qualifier}."));
        }

        ToolResult::text(render::render_monitors(&filtered))
    }

    /// Handles `get_monitor_metrics`.
    async fn handle_get_monitor_metrics(
        &self,
        args: MonitorMetricsRequest,
        auth: Option<&str>,
    ) -> ToolResult {
        let target = match self
            .resolve_monitor_target(args.monitor_id.as_deref(), args.monitor_name.as_deref(), auth)
            .await
        {
            Ok(target) => target,
            Err(result) => return result,
        };
        let options = CallOptions::authorized(auth);
        let payload = match self
            .gateway
            .get(&format!("/metric-query/monitor-summary/{target}"), &[], &options)
            .await
        {
            Ok(payload) => payload,
            Err(err) => return gateway_error(&err),
        };
        let summary: MonitorMetricsSummary = match decode(payload) {
            Ok(summary) => summary,
            Err(err) => return gateway_error(&err),
        };
        ToolResult::text(render::render_monitor_metrics(&summary, OffsetDateTime::now_utc()))
    }

    // ------------------------------------------------------------------
    // Shared fetch and resolution helpers
    // ------------------------------------------------------------------

    /// Fetches the full service list.
    async fn fetch_services(&self, auth: Option<&str>) -> Result<Vec<Service>, GatewayError> {
        let payload =
            self.gateway.get("/services", &[], &CallOptions::authorized(auth)).await?;
        decode(payload)
    }

    /// Fetches the monitor list, tolerating both backend list shapes.
    async fn fetch_monitors(
        &self,
        query: &[(String, String)],
        auth: Option<&str>,
    ) -> Result<Vec<Monitor>, GatewayError> {
        let payload =
            self.gateway.get("/monitors", query, &CallOptions::authorized(auth)).await?;
        Ok(decode::<MonitorsPayload>(payload)
            .map(MonitorsPayload::into_monitors)
            .unwrap_or_default())
    }

    /// Fetches a service's health score, soft-failing to unknown.
    async fn fetch_health(&self, service: &ServiceId, auth: Option<&str>) -> Option<f64> {
        let payload = self
            .gateway
            .get(&format!("/services/{service}/health"), &[], &CallOptions::authorized(auth))
            .await
            .ok()?;
        decode::<HealthReport>(payload).ok()?.health_score
    }

    /// Resolves a monitor target from an id or fuzzy name.
    ///
    /// # Errors
    ///
    /// Returns the advisory or error [`ToolResult`] to hand back when no
    /// unique monitor could be determined.
    async fn resolve_monitor_target(
        &self,
        monitor_id: Option<&str>,
        monitor_name: Option<&str>,
        auth: Option<&str>,
    ) -> Result<MonitorId, ToolResult> {
        if let Some(monitor_id) = trimmed(monitor_id) {
            return Ok(MonitorId::new(monitor_id));
        }
        let Some(name) = trimmed(monitor_name) else {
            return Err(ToolResult::text("Please provide either monitor_id or monitor_name."));
        };
        let monitors = self
            .fetch_monitors(&[], auth)
            .await
            .map_err(|err| gateway_error(&err))?;
        match resolve(&monitors, name) {
            Resolution::Resolved(monitor) => Ok(monitor.id.clone()),
            Resolution::Ambiguous(candidates) => {
                Err(ToolResult::text(ambiguous_monitors_message(name, &candidates)))
            }
            Resolution::NotFound => {
                Err(ToolResult::text(format!("No monitor found matching \"{name}\".")))
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Normalizes an optional argument: trims whitespace, maps blank to absent.
fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Decodes tool arguments, treating a null payload as empty arguments.
fn decode_args<T: DeserializeOwned + Default>(arguments: Value) -> Result<T, ToolResult> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments)
        .map_err(|err| ToolResult::error(format!("Invalid arguments: {err}")))
}

/// Wraps a gateway failure into an error-flagged envelope.
fn gateway_error(err: &GatewayError) -> ToolResult {
    ToolResult::error(format!("Error: {err}"))
}

/// Builds the disambiguation advisory for an ambiguous service name.
fn ambiguous_services_message(query: &str, candidates: &[&Service]) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|service| format!("  - {} (id: {})", service.name, service.id))
        .collect();
    format!(
        "Multiple services match \"{query}\":\n{}\n\nPlease use service_id or a more specific \
         name.",
        lines.join("\n")
    )
}

/// Builds the disambiguation advisory for an ambiguous monitor name.
fn ambiguous_monitors_message(query: &str, candidates: &[&Monitor]) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|monitor| format!("  - {} (id: {}, type: {})", monitor.name, monitor.id, monitor.kind))
        .collect();
    format!(
        "Multiple monitors match \"{query}\":\n{}\n\nPlease use monitor_id or a more specific \
         name.",
        lines.join("\n")
    )
}

/// Extracts one analysis from an RCA lookup payload.
///
/// The backend returns either a list (newest first) or a single object; an
/// analysis without an id is treated as absent.
fn extract_rca(payload: Value) -> Option<Rca> {
    let candidate = match payload {
        Value::Array(mut items) => {
            if items.is_empty() {
                return None;
            }
            items.swap_remove(0)
        }
        other => other,
    };
    let rca: Rca = decode(candidate).ok()?;
    rca.id.is_some().then_some(rca)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
