// crates/pulsegate-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical MCP tool identifiers for Pulsegate.
// Purpose: Shared tool naming across the router, config, and CLI.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers exposed by the Pulsegate MCP server.
//! These names are part of the external contract surface.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Canonical tool names for the Pulsegate MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Fetch health status for a service or all services.
    GetServiceStatus,
    /// Fetch active predictions with confidence filtering.
    GetPredictions,
    /// Fetch incidents with status and time-window filtering.
    GetIncidents,
    /// Fetch detailed health for a single monitor.
    GetMonitorHealth,
    /// Fetch recent deployments and incident correlations.
    GetDeployments,
    /// Run or fetch a root-cause analysis.
    RunRootCauseAnalysis,
    /// Compute a deploy-safety verdict.
    IsSafeToDeploy,
    /// Fetch an executive summary of infrastructure health.
    GetExecutiveSummary,
    /// List monitors with status and type filtering.
    GetMonitors,
    /// Fetch a detailed metrics summary for a monitor.
    GetMonitorMetrics,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetServiceStatus => "get_service_status",
            Self::GetPredictions => "get_predictions",
            Self::GetIncidents => "get_incidents",
            Self::GetMonitorHealth => "get_monitor_health",
            Self::GetDeployments => "get_deployments",
            Self::RunRootCauseAnalysis => "run_root_cause_analysis",
            Self::IsSafeToDeploy => "is_safe_to_deploy",
            Self::GetExecutiveSummary => "get_executive_summary",
            Self::GetMonitors => "get_monitors",
            Self::GetMonitorMetrics => "get_monitor_metrics",
        }
    }

    /// Returns all Pulsegate tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GetServiceStatus,
            Self::GetPredictions,
            Self::GetIncidents,
            Self::GetMonitorHealth,
            Self::GetDeployments,
            Self::RunRootCauseAnalysis,
            Self::IsSafeToDeploy,
            Self::GetExecutiveSummary,
            Self::GetMonitors,
            Self::GetMonitorMetrics,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get_service_status" => Some(Self::GetServiceStatus),
            "get_predictions" => Some(Self::GetPredictions),
            "get_incidents" => Some(Self::GetIncidents),
            "get_monitor_health" => Some(Self::GetMonitorHealth),
            "get_deployments" => Some(Self::GetDeployments),
            "run_root_cause_analysis" => Some(Self::RunRootCauseAnalysis),
            "is_safe_to_deploy" => Some(Self::IsSafeToDeploy),
            "get_executive_summary" => Some(Self::GetExecutiveSummary),
            "get_monitors" => Some(Self::GetMonitors),
            "get_monitor_metrics" => Some(Self::GetMonitorMetrics),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
