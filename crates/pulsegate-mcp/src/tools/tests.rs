// crates/pulsegate-mcp/src/tools/tests.rs
// ============================================================================
// Module: MCP Tool Router Unit Tests
// Description: Unit tests for tool routing and handler behavior.
// Purpose: Validate resolution advisories, verdicts, and error envelopes.
// Dependencies: pulsegate-mcp, pulsegate-core, pulsegate-gateway
// ============================================================================

//! ## Overview
//! Exercises tool handlers against an in-memory gateway stub: resolution
//! contract outcomes, deploy-safety verdicts under partial failure, RCA
//! cache checks, window filters, and the error-envelope discipline.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::*;
use crate::audit::NoopAuditSink;

// ============================================================================
// SECTION: Gateway Stub
// ============================================================================

/// Scripted failure for a stubbed route.
enum StubFailure {
    /// Non-2xx response with a message body.
    Http(u16, &'static str),
    /// Transport-level failure.
    Network,
    /// Exceeded deadline.
    Timeout,
}

impl StubFailure {
    fn to_error(&self) -> GatewayError {
        match self {
            Self::Http(status, message) => GatewayError::Http {
                status: *status,
                message: (*message).to_string(),
            },
            Self::Network => GatewayError::Network("connection refused".to_string()),
            Self::Timeout => GatewayError::Timeout {
                timeout_ms: 50,
            },
        }
    }
}

/// In-memory gateway answering scripted routes and recording calls.
struct StubGateway {
    /// Scripted responses keyed by "METHOD path".
    responses: BTreeMap<String, Result<Value, StubFailure>>,
    /// Recorded calls with their query strings.
    calls: Mutex<Vec<String>>,
}

impl StubGateway {
    fn new() -> Self {
        Self {
            responses: BTreeMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn on_get(mut self, path: &str, payload: Value) -> Self {
        self.responses.insert(format!("GET {path}"), Ok(payload));
        self
    }

    fn fail_get(mut self, path: &str, failure: StubFailure) -> Self {
        self.responses.insert(format!("GET {path}"), Err(failure));
        self
    }

    fn on_post(mut self, path: &str, payload: Value) -> Self {
        self.responses.insert(format!("POST {path}"), Ok(payload));
        self
    }

    fn answer(&self, method: &str, path: &str, query_suffix: &str) -> Result<Value, GatewayError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{method} {path}{query_suffix}"));
        match self.responses.get(&format!("{method} {path}")) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Err(GatewayError::Http {
                status: 404,
                message: format!("no stub for {method} {path}"),
            }),
        }
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        _options: &CallOptions,
    ) -> Result<Value, GatewayError> {
        let suffix = if query.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> =
                query.iter().map(|(key, value)| format!("{key}={value}")).collect();
            format!("?{}", pairs.join("&"))
        };
        self.answer("GET", path, &suffix)
    }

    async fn post(
        &self,
        path: &str,
        _body: Option<Value>,
        _options: &CallOptions,
    ) -> Result<Value, GatewayError> {
        self.answer("POST", path, "")
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn router_with(stub: StubGateway) -> (ToolRouter, Arc<StubGateway>) {
    let gateway = Arc::new(stub);
    let router = ToolRouter::new(Arc::clone(&gateway) as Arc<dyn Gateway>, Arc::new(NoopAuditSink));
    (router, gateway)
}

async fn call(router: &ToolRouter, tool: &str, args: Value) -> ToolResult {
    router.handle_tool_call(&RequestContext::stdio(), tool, args).await
}

fn text_of(result: &ToolResult) -> &str {
    result.first_text().expect("text content")
}

fn rfc3339_hours_ago(hours: i64) -> String {
    (OffsetDateTime::now_utc() - Duration::hours(hours)).format(&Rfc3339).expect("format")
}

fn services_fixture() -> Value {
    json!([
        {"id": "svc-1", "name": "Checkout API", "environment": "production"},
        {"id": "svc-2", "name": "Checkout Worker", "environment": "production"},
        {"id": "svc-3", "name": "Billing", "environment": "production"},
    ])
}

// ============================================================================
// SECTION: Routing Tests
// ============================================================================

#[tokio::test]
async fn unknown_tool_returns_error_envelope() {
    let (router, _) = router_with(StubGateway::new());
    let result = call(&router, "get_everything", Value::Null).await;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Unknown tool: get_everything");
}

#[tokio::test]
async fn malformed_arguments_return_error_envelope() {
    let (router, _) = router_with(StubGateway::new());
    let result = call(&router, "get_incidents", json!(["not", "an", "object"])).await;
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).starts_with("Invalid arguments:"));
}

#[tokio::test]
async fn null_arguments_are_treated_as_empty() {
    let stub = StubGateway::new().on_get("/services", services_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", Value::Null).await;
    assert_eq!(result.is_error, None);
    assert!(text_of(&result).starts_with("3 services"));
}

#[tokio::test]
async fn tool_catalog_covers_every_tool_in_order() {
    let definitions = tool_definitions();
    let names: Vec<ToolName> = definitions.iter().map(|definition| definition.name).collect();
    assert_eq!(names, ToolName::all());
    for definition in &definitions {
        assert_eq!(definition.input_schema["type"], "object");
    }
}

// ============================================================================
// SECTION: Service Status Tests
// ============================================================================

#[tokio::test]
async fn service_status_lists_all_services_without_args() {
    let stub = StubGateway::new().on_get("/services", services_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({})).await;
    assert!(text_of(&result).contains("Checkout API"));
    assert!(text_of(&result).contains("ID: svc-3"));
}

#[tokio::test]
async fn service_status_by_id_merges_health_score() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1", json!({"id": "svc-1", "name": "Checkout API"}))
        .on_get("/services/svc-1/health", json!({"healthScore": 97.3}));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_id": "svc-1"})).await;
    assert!(text_of(&result).contains("Service: Checkout API"));
    assert!(text_of(&result).contains("Health Score: 97.3%"));
}

#[tokio::test]
async fn service_status_survives_failed_health_lookup() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1", json!({"id": "svc-1", "name": "Checkout API"}))
        .fail_get("/services/svc-1/health", StubFailure::Network);
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_id": "svc-1"})).await;
    assert_eq!(result.is_error, None);
    assert!(!text_of(&result).contains("Health Score"));
}

#[tokio::test]
async fn exact_name_match_wins_over_substring() {
    let stub = StubGateway::new()
        .on_get(
            "/services",
            json!([
                {"id": "svc-1", "name": "API"},
                {"id": "svc-2", "name": "API Gateway"},
            ]),
        )
        .on_get("/services/svc-1/health", json!({"healthScore": 88.0}));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_name": "API"})).await;
    assert!(text_of(&result).contains("Service: API\n"));
    assert!(text_of(&result).contains("Health Score: 88.0%"));
}

#[tokio::test]
async fn ambiguous_name_lists_candidates_in_order() {
    let stub = StubGateway::new().on_get("/services", services_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_name": "checkout"})).await;
    assert_eq!(result.is_error, None);
    let text = text_of(&result);
    assert!(text.starts_with("Multiple services match \"checkout\":"));
    let api = text.find("Checkout API (id: svc-1)").expect("first candidate");
    let worker = text.find("Checkout Worker (id: svc-2)").expect("second candidate");
    assert!(api < worker);
    assert!(text.contains("Please use service_id or a more specific name."));
}

#[tokio::test]
async fn unmatched_name_reports_not_found() {
    let stub = StubGateway::new().on_get("/services", services_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_name": "payments"})).await;
    assert_eq!(result.is_error, None);
    assert_eq!(text_of(&result), "No service found matching \"payments\".");
}

#[tokio::test]
async fn blank_name_argument_is_treated_as_absent() {
    let stub = StubGateway::new().on_get("/services", services_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_name": "   "})).await;
    assert!(text_of(&result).starts_with("3 services"));
}

#[tokio::test]
async fn service_list_failure_surfaces_error_envelope() {
    let stub = StubGateway::new()
        .fail_get("/services", StubFailure::Http(502, "backend unavailable"));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_service_status", json!({"service_name": "checkout"})).await;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: backend unavailable");
}

// ============================================================================
// SECTION: Deploy Safety Tests
// ============================================================================

#[tokio::test]
async fn critical_incident_blocks_deploy() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1/health", json!({"healthScore": null}))
        .on_get("/predictive/alerts", json!([]))
        .on_get(
            "/incidents",
            json!([{
                "id": "inc-1",
                "title": "Checkout down",
                "severity": "critical",
                "status": "investigating",
                "serviceId": "svc-1",
            }]),
        );
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({"service_id": "svc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[UNSAFE] Deploy Safety Check"));
    assert!(text.contains("Risk Level: high"));
    assert!(text.contains("Recommendation: wait_and_monitor"));
    assert!(text.contains("[incident] Critical incident: Checkout down (investigating)"));
}

#[tokio::test]
async fn medium_confidence_prediction_allows_cautious_deploy() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1/health", json!({"healthScore": 90.0}))
        .on_get(
            "/predictive/alerts",
            json!([{
                "predictionType": "latency-degradation",
                "confidence": 0.65,
                "serviceId": "svc-1",
                "monitor": {"name": "checkout-db"},
            }]),
        )
        .on_get("/incidents", json!([]));
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({"service_id": "svc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[CAUTION]"));
    assert!(text.contains("Risk Level: medium"));
    assert!(text.contains("Recommendation: proceed_with_caution"));
    assert!(text.contains("latency-degradation: checkout-db (confidence: 65%)"));
}

#[tokio::test]
async fn partial_fetch_failure_still_produces_a_verdict() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1/health", json!({"healthScore": 95.0}))
        .on_get("/predictive/alerts", json!([]))
        .fail_get("/incidents", StubFailure::Timeout);
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({"service_id": "svc-1"})).await;
    assert_eq!(result.is_error, None);
    let text = text_of(&result);
    assert!(text.starts_with("[SAFE]"));
    assert!(text.contains("Recommendation: proceed"));
}

#[tokio::test]
async fn all_signals_clear_reports_safe_with_generic_label() {
    let stub = StubGateway::new()
        .on_get("/predictive/alerts", json!([]))
        .on_get("/incidents", json!([]));
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[SAFE]"));
    assert!(text.contains("your infrastructure is stable with no active issues. Safe to deploy."));
}

#[tokio::test]
async fn resolved_service_name_parameterizes_the_reason() {
    let stub = StubGateway::new()
        .on_get("/services", services_fixture())
        .on_get("/services/svc-3/health", json!({"healthScore": 60.0}))
        .on_get("/predictive/alerts", json!([]))
        .on_get("/incidents", json!([]));
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({"service_name": "billing"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[UNSAFE]"));
    assert!(text.contains("Billing has critical issues."));
    assert!(text.contains("below 70% threshold"));
}

#[tokio::test]
async fn safety_check_scopes_signals_to_the_target_service() {
    let stub = StubGateway::new()
        .on_get("/services/svc-1/health", json!({"healthScore": 99.0}))
        .on_get(
            "/predictive/alerts",
            json!([{
                "predictionType": "cert-expiry",
                "confidence": 0.9,
                "serviceId": "svc-other",
            }]),
        )
        .on_get(
            "/incidents",
            json!([{
                "id": "inc-2",
                "severity": "critical",
                "status": "detecting",
                "monitor": {"name": "other-db", "serviceId": "svc-other"},
            }]),
        );
    let (router, _) = router_with(stub);
    let result = call(&router, "is_safe_to_deploy", json!({"service_id": "svc-1"})).await;
    assert!(text_of(&result).starts_with("[SAFE]"));
}

// ============================================================================
// SECTION: Prediction Tests
// ============================================================================

#[tokio::test]
async fn predictions_filter_by_confidence_service_and_status() {
    let stub = StubGateway::new().on_get(
        "/predictive/alerts",
        json!([
            {"predictionType": "keep", "confidence": 0.75, "serviceId": "svc-1"},
            {"predictionType": "low-confidence", "confidence": 0.30, "serviceId": "svc-1"},
            {"predictionType": "other-service", "confidence": 0.90, "serviceId": "svc-2"},
            {"predictionType": "expired", "confidence": 0.90, "serviceId": "svc-1", "status": "expired"},
        ]),
    );
    let (router, _) = router_with(stub);
    let result =
        call(&router, "get_predictions", json!({"service_id": "svc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("1 active predictions:"));
    assert!(text.contains("keep"));
    assert!(!text.contains("low-confidence"));
    assert!(!text.contains("other-service"));
    assert!(!text.contains("expired"));
}

#[tokio::test]
async fn predictions_for_monitor_use_the_monitor_route() {
    let stub = StubGateway::new().on_get(
        "/monitors/m-1/predictions",
        json!([{"predictionType": "latency", "confidence": 88.0}]),
    );
    let (router, gateway) = router_with(stub);
    let result = call(&router, "get_predictions", json!({"monitor_id": "m-1"})).await;
    assert!(text_of(&result).contains("latency"));
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert_eq!(calls, vec!["GET /monitors/m-1/predictions".to_string()]);
}

#[tokio::test]
async fn non_list_prediction_payload_renders_empty() {
    let stub = StubGateway::new().on_get("/predictive/alerts", json!({"unexpected": true}));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_predictions", json!({})).await;
    assert_eq!(text_of(&result), "No active predictions.");
}

// ============================================================================
// SECTION: Incident Tests
// ============================================================================

#[tokio::test]
async fn incidents_filter_by_window_and_active_status() {
    let stub = StubGateway::new().on_get(
        "/incidents",
        json!([
            {"id": "inc-recent", "title": "Fresh", "severity": "high", "status": "investigating",
             "startTime": rfc3339_hours_ago(2)},
            {"id": "inc-resolved", "title": "Done", "severity": "high", "status": "resolved",
             "startTime": rfc3339_hours_ago(2)},
            {"id": "inc-old", "title": "Stale", "severity": "high", "status": "investigating",
             "startTime": rfc3339_hours_ago(48)},
        ]),
    );
    let (router, _) = router_with(stub);
    let result =
        call(&router, "get_incidents", json!({"include_rca": false})).await;
    let text = text_of(&result);
    assert!(text.starts_with("1 incidents:"));
    assert!(text.contains("Fresh"));
    assert!(!text.contains("Done"));
    assert!(!text.contains("Stale"));
}

#[tokio::test]
async fn incident_status_filter_passes_through_to_backend() {
    let stub = StubGateway::new().on_get("/incidents", json!([]));
    let (router, gateway) = router_with(stub);
    let _ = call(&router, "get_incidents", json!({"status": "resolved"})).await;
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert_eq!(calls, vec!["GET /incidents?limit=10&status=resolved".to_string()]);
}

#[tokio::test]
async fn incidents_attach_rca_when_available() {
    let stub = StubGateway::new()
        .on_get(
            "/incidents",
            json!([{
                "id": "inc-1", "title": "Checkout down", "severity": "critical",
                "status": "investigating", "startTime": rfc3339_hours_ago(1),
            }]),
        )
        .on_get(
            "/rca/incident/inc-1",
            json!([{
                "id": "rca-1",
                "rootCauseSummary": "Pool exhausted",
                "rootCauseType": "resource",
                "confidenceScore": 91.0,
            }]),
        );
    let (router, _) = router_with(stub);
    let result = call(&router, "get_incidents", json!({})).await;
    assert!(text_of(&result).contains("RCA: Pool exhausted (resource, confidence: 91.0%)"));
}

#[tokio::test]
async fn failed_rca_lookup_leaves_incident_unannotated() {
    let stub = StubGateway::new()
        .on_get(
            "/incidents",
            json!([{
                "id": "inc-1", "title": "Checkout down", "severity": "critical",
                "status": "investigating", "startTime": rfc3339_hours_ago(1),
            }]),
        )
        .fail_get("/rca/incident/inc-1", StubFailure::Network);
    let (router, _) = router_with(stub);
    let result = call(&router, "get_incidents", json!({})).await;
    assert_eq!(result.is_error, None);
    assert!(!text_of(&result).contains("RCA:"));
}

#[tokio::test]
async fn empty_incident_list_renders_friendly_message() {
    let stub = StubGateway::new().on_get("/incidents", json!([]));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_incidents", json!({})).await;
    assert_eq!(text_of(&result), "No incidents found.");
}

// ============================================================================
// SECTION: Root-Cause Analysis Tests
// ============================================================================

#[tokio::test]
async fn rca_requires_a_target() {
    let (router, _) = router_with(StubGateway::new());
    let result = call(&router, "run_root_cause_analysis", json!({})).await;
    assert_eq!(result.is_error, None);
    assert_eq!(text_of(&result), "Please provide either incident_id or service_id.");
}

#[tokio::test]
async fn existing_rca_is_returned_as_cached() {
    let stub = StubGateway::new().on_get(
        "/rca/incident/inc-1",
        json!({"id": "rca-1", "rootCauseSummary": "Bad deploy"}),
    );
    let (router, gateway) = router_with(stub);
    let result =
        call(&router, "run_root_cause_analysis", json!({"incident_id": "inc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[CACHED] Existing RCA found:"));
    assert!(text.contains("Bad deploy"));
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert!(!calls.iter().any(|call| call.starts_with("POST")));
}

#[tokio::test]
async fn failed_existence_check_falls_through_to_generation() {
    let stub = StubGateway::new()
        .fail_get("/rca/incident/inc-1", StubFailure::Http(500, "lookup broken"))
        .on_post(
            "/rca/analyze",
            json!({"id": "rca-2", "rootCauseSummary": "Cascade from database"}),
        );
    let (router, _) = router_with(stub);
    let result =
        call(&router, "run_root_cause_analysis", json!({"incident_id": "inc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("[NEW] RCA generated:"));
    assert!(text.contains("Cascade from database"));
}

#[tokio::test]
async fn empty_rca_list_falls_through_to_generation() {
    let stub = StubGateway::new()
        .on_get("/rca/incident/inc-1", json!([]))
        .on_post("/rca/analyze", json!({"id": "rca-3", "rootCauseSummary": "Fresh analysis"}));
    let (router, _) = router_with(stub);
    let result =
        call(&router, "run_root_cause_analysis", json!({"incident_id": "inc-1"})).await;
    assert!(text_of(&result).starts_with("[NEW] RCA generated:"));
}

#[tokio::test]
async fn generation_failure_surfaces_error_envelope() {
    let stub = StubGateway::new()
        .fail_get("/rca/incident/inc-1", StubFailure::Network)
        .fail_get("/rca/analyze", StubFailure::Network);
    let (router, _) = router_with(stub);
    let result =
        call(&router, "run_root_cause_analysis", json!({"incident_id": "inc-1"})).await;
    assert_eq!(result.is_error, Some(true));
}

// ============================================================================
// SECTION: Monitor Tests
// ============================================================================

fn monitors_fixture() -> Value {
    json!([
        {"id": "m-1", "name": "Edge TLS", "type": "http", "operationalStatus": "up"},
        {"id": "m-2", "name": "Edge DNS", "type": "dns", "operationalStatus": "down"},
        {"id": "m-3", "name": "Batch", "type": "tcp", "status": "paused"},
    ])
}

#[tokio::test]
async fn monitors_filter_operational_status_client_side() {
    let stub = StubGateway::new().on_get("/monitors", monitors_fixture());
    let (router, gateway) = router_with(stub);
    let result = call(&router, "get_monitors", json!({"status": "down"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("1 monitors"));
    assert!(text.contains("Edge DNS"));
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert_eq!(calls, vec!["GET /monitors?limit=100".to_string()]);
}

#[tokio::test]
async fn monitors_admin_status_passes_through_to_backend() {
    let stub = StubGateway::new().on_get("/monitors", json!([]));
    let (router, gateway) = router_with(stub);
    let result = call(&router, "get_monitors", json!({"status": "paused"})).await;
    assert_eq!(text_of(&result), "No monitors found with status \"paused\".");
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert_eq!(calls, vec!["GET /monitors?limit=100&status=paused".to_string()]);
}

#[tokio::test]
async fn monitors_wrapped_payload_is_unwrapped() {
    let stub = StubGateway::new().on_get("/monitors", json!({"monitors": monitors_fixture()}));
    let (router, _) = router_with(stub);
    let result = call(&router, "get_monitors", json!({})).await;
    assert!(text_of(&result).starts_with("3 monitors"));
}

#[tokio::test]
async fn monitor_health_requires_a_target() {
    let (router, _) = router_with(StubGateway::new());
    let result = call(&router, "get_monitor_health", json!({})).await;
    assert_eq!(text_of(&result), "Please provide either monitor_id or monitor_name.");
}

#[tokio::test]
async fn monitor_health_resolves_name_and_soft_fails_predictions() {
    let stub = StubGateway::new()
        .on_get("/monitors", monitors_fixture())
        .on_get(
            "/monitors/m-2",
            json!({"id": "m-2", "name": "Edge DNS", "type": "dns", "operationalStatus": "down",
                   "responseTime": 420.0, "uptimePercentage": 93.4}),
        )
        .fail_get("/monitors/m-2/predictions", StubFailure::Timeout);
    let (router, _) = router_with(stub);
    let result =
        call(&router, "get_monitor_health", json!({"monitor_name": "edge dns"})).await;
    let text = text_of(&result);
    assert!(text.contains("Monitor: Edge DNS"));
    assert!(text.contains("Response Time: 420ms | Uptime: 93.4%"));
    assert!(!text.contains("Active Predictions"));
}

#[tokio::test]
async fn ambiguous_monitor_name_lists_candidates_with_type() {
    let stub = StubGateway::new().on_get("/monitors", monitors_fixture());
    let (router, _) = router_with(stub);
    let result = call(&router, "get_monitor_health", json!({"monitor_name": "edge"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("Multiple monitors match \"edge\":"));
    assert!(text.contains("Edge TLS (id: m-1, type: http)"));
    assert!(text.contains("Please use monitor_id or a more specific name."));
}

#[tokio::test]
async fn monitor_metrics_renders_summary_sections() {
    let stub = StubGateway::new().on_get(
        "/metric-query/monitor-summary/m-1",
        json!({
            "monitor": {"id": "m-1", "name": "Edge TLS", "type": "http", "target": "https://edge"},
            "responseTime": {"current": 120.0, "avgDay": 140.0},
            "uptime": {"day": 99.99, "week": 99.5},
            "checks": {"day": {"total": 1440, "up": 1439, "down": 1}},
        }),
    );
    let (router, _) = router_with(stub);
    let result = call(&router, "get_monitor_metrics", json!({"monitor_id": "m-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("Monitor: Edge TLS (http)"));
    assert!(text.contains("Current: 120ms | Day avg: 140ms"));
    assert!(text.contains("Last 24h: 1440 total | 1439 up | 1 down"));
}

// ============================================================================
// SECTION: Deployment and Summary Tests
// ============================================================================

#[tokio::test]
async fn deployments_filter_by_window_and_service() {
    let stub = StubGateway::new().on_get(
        "/deployments",
        json!([
            {"serviceId": "svc-1", "commitMessage": "fresh deploy", "deployedAt": rfc3339_hours_ago(1)},
            {"serviceId": "svc-2", "commitMessage": "other service", "deployedAt": rfc3339_hours_ago(1)},
            {"serviceId": "svc-1", "commitMessage": "ancient deploy", "deployedAt": rfc3339_hours_ago(72)},
        ]),
    );
    let (router, _) = router_with(stub);
    let result = call(&router, "get_deployments", json!({"service_id": "svc-1"})).await;
    let text = text_of(&result);
    assert!(text.starts_with("1 deployments:"));
    assert!(text.contains("fresh deploy"));
    assert!(!text.contains("other service"));
    assert!(!text.contains("ancient deploy"));
}

#[tokio::test]
async fn deployments_can_omit_correlations() {
    let stub = StubGateway::new().on_get(
        "/deployments",
        json!([{
            "serviceId": "svc-1",
            "commitMessage": "risky deploy",
            "deployedAt": rfc3339_hours_ago(1),
            "correlations": [{"correlationScore": 0.9, "confidence": "high"}],
        }]),
    );
    let (router, _) = router_with(stub);
    let result =
        call(&router, "get_deployments", json!({"include_correlations": false})).await;
    assert!(!text_of(&result).contains("Correlations:"));
}

#[tokio::test]
async fn executive_summary_forwards_period_and_language() {
    let stub = StubGateway::new().on_get(
        "/executive-summary",
        json!({"summary": "All quiet.", "metrics": {"overallHealth": 99.1}}),
    );
    let (router, gateway) = router_with(stub);
    let result = call(&router, "get_executive_summary", json!({})).await;
    let text = text_of(&result);
    assert!(text.starts_with("All quiet."));
    assert!(text.contains("Overall Health: 99.1%"));
    let calls = gateway.calls.lock().expect("calls lock").clone();
    assert_eq!(calls, vec!["GET /executive-summary?hours=12&language=es".to_string()]);
}
