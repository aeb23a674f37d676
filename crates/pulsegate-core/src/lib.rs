// crates/pulsegate-core/src/lib.rs
// ============================================================================
// Module: Pulsegate Core
// Description: Domain model and decision logic for the Pulsegate MCP server.
// Purpose: Provide pure, I/O-free types and algorithms shared by all crates.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Pulsegate Core holds everything the MCP layer must get exactly right
//! without touching the network: the typed backend data model, fuzzy entity
//! resolution, and the deploy-safety risk classifier. All functions here are
//! deterministic; timestamps are supplied by callers rather than read from
//! the wall clock.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod model;
pub mod resolve;
pub mod risk;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use model::Deployment;
pub use model::DeploymentCorrelation;
pub use model::ExecutiveSummary;
pub use model::HealthReport;
pub use model::Incident;
pub use model::IncidentId;
pub use model::IncidentStatus;
pub use model::Monitor;
pub use model::MonitorId;
pub use model::MonitorKind;
pub use model::MonitorMetricsSummary;
pub use model::MonitorRef;
pub use model::MonitorStatus;
pub use model::OperationalStatus;
pub use model::Prediction;
pub use model::PredictionStatus;
pub use model::Rca;
pub use model::Service;
pub use model::ServiceId;
pub use model::ServiceMonitor;
pub use model::Severity;
pub use resolve::Named;
pub use resolve::Resolution;
pub use resolve::resolve;
pub use risk::ActiveIssue;
pub use risk::AggregatedSignals;
pub use risk::IssueKind;
pub use risk::Recommendation;
pub use risk::RiskAssessment;
pub use risk::RiskLevel;
pub use risk::active_incidents;
pub use risk::active_predictions;
pub use risk::classify;
pub use risk::normalize_confidence;
pub use tooling::ToolName;
