// crates/pulsegate-core/src/model.rs
// ============================================================================
// Module: Backend Data Model
// Description: Typed representations of monitoring backend payloads.
// Purpose: Validate loosely-typed gateway JSON at the boundary.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Every payload the gateway returns is deserialized into the explicit types
//! in this module before any decision logic runs. Enum-like wire strings
//! become closed variant sets with an `Unknown` catch-all, and absent or
//! null fields become explicit `Option`s. Downstream code matches on
//! variants only, never on raw strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Service identifier issued by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a new service identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServiceId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Monitor identifier issued by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorId(String);

impl MonitorId {
    /// Creates a new monitor identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MonitorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MonitorId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Incident identifier issued by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(String);

impl IncidentId {
    /// Creates a new incident identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IncidentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IncidentId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Incident or prediction severity reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Critical severity; blocks deployments on its own.
    Critical,
    /// High severity.
    High,
    /// Medium severity.
    Medium,
    /// Low severity.
    Low,
    /// Unrecognized or absent severity.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Returns the canonical wire string for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident lifecycle status.
///
/// # Invariants
/// - Only [`IncidentStatus::Resolved`] and [`IncidentStatus::FalsePositive`]
///   are inactive; every other status, including unrecognized future ones,
///   counts as active. Unknown statuses failing toward "active" is the safe
///   direction for a deploy gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    /// Anomaly detected, not yet confirmed.
    Detecting,
    /// Under active investigation.
    Investigating,
    /// Root cause identified.
    Identified,
    /// Fix in progress.
    Resolving,
    /// Fix applied, under observation.
    Monitoring,
    /// Incident closed.
    Resolved,
    /// Incident dismissed as a false alarm.
    FalsePositive,
    /// Unrecognized or absent status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl IncidentStatus {
    /// Returns the canonical wire string for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detecting => "detecting",
            Self::Investigating => "investigating",
            Self::Identified => "identified",
            Self::Resolving => "resolving",
            Self::Monitoring => "monitoring",
            Self::Resolved => "resolved",
            Self::FalsePositive => "false-positive",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true when the status represents an ongoing incident.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Resolved | Self::FalsePositive)
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prediction lifecycle status. An absent status also means active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    /// Prediction is in effect.
    Active,
    /// Expired, dismissed, or otherwise no longer in effect.
    #[serde(other)]
    Inactive,
}

/// Administrative monitor status set by operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    /// Monitor is checking its target.
    #[default]
    Active,
    /// Checks suspended by an operator.
    Paused,
    /// Checks suspended for a maintenance window.
    Maintenance,
    /// Unrecognized administrative status.
    #[serde(other)]
    Unknown,
}

impl MonitorStatus {
    /// Returns the canonical wire string for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Maintenance => "maintenance",
            Self::Unknown => "unknown",
        }
    }
}

/// Operational monitor status derived from check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    /// Target is responding normally.
    Up,
    /// Target is responding with elevated latency or partial errors.
    Degraded,
    /// Target is failing checks.
    Down,
    /// Unrecognized operational status.
    #[serde(other)]
    Unknown,
}

impl OperationalStatus {
    /// Returns the canonical wire string for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Degraded => "degraded",
            Self::Down => "down",
            Self::Unknown => "unknown",
        }
    }
}

/// Monitor check type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorKind {
    /// HTTP(S) endpoint check.
    Http,
    /// TCP port check.
    Tcp,
    /// DNS resolution check.
    Dns,
    /// Database connectivity check.
    Database,
    /// Mail roundtrip check.
    Email,
    /// Scripted multi-step check.
    Synthetic,
    /// Heartbeat accepted from the target.
    Push,
    /// ICMP reachability check.
    Ping,
    /// Unrecognized monitor type.
    #[default]
    #[serde(other)]
    Unknown,
}

impl MonitorKind {
    /// Returns the canonical wire string for the monitor type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Tcp => "tcp",
            Self::Dns => "dns",
            Self::Database => "database",
            Self::Email => "email",
            Self::Synthetic => "synthetic",
            Self::Push => "push",
            Self::Ping => "ping",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Monitors and Services
// ============================================================================

/// A single checked endpoint or target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Monitor identifier.
    pub id: MonitorId,
    /// Human-readable monitor name.
    pub name: String,
    /// Monitor check type.
    #[serde(rename = "type", default)]
    pub kind: MonitorKind,
    /// Administrative status.
    #[serde(default)]
    pub status: MonitorStatus,
    /// Operational status from recent checks.
    pub operational_status: Option<OperationalStatus>,
    /// Latest response time in milliseconds.
    pub response_time: Option<f64>,
    /// Uptime percentage over the backend's default window.
    pub uptime_percentage: Option<f64>,
    /// Checked target (URL, host, etc.).
    pub target: Option<String>,
}

impl Monitor {
    /// Returns the status shown to operators: the administrative status when
    /// checks are suspended, otherwise the operational status.
    #[must_use]
    pub fn effective_status(&self) -> &'static str {
        match self.status {
            MonitorStatus::Paused => "paused",
            MonitorStatus::Maintenance => "maintenance",
            MonitorStatus::Active | MonitorStatus::Unknown => {
                self.operational_status.map_or("up", OperationalStatus::as_str)
            }
        }
    }
}

/// Monitor entry inside a service, either wrapped or inlined by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceMonitor {
    /// Join-table form carrying the monitor under a `monitor` key.
    Wrapped {
        /// The wrapped monitor record.
        monitor: Monitor,
    },
    /// Monitor record inlined directly in the list.
    Inline(Monitor),
}

impl ServiceMonitor {
    /// Returns the underlying monitor regardless of wire shape.
    #[must_use]
    pub const fn monitor(&self) -> &Monitor {
        match self {
            Self::Wrapped {
                monitor,
            }
            | Self::Inline(monitor) => monitor,
        }
    }
}

/// A logical grouping of monitors with an aggregate health score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service identifier.
    pub id: ServiceId,
    /// Human-readable service name.
    pub name: String,
    /// Deployment environment label (production, staging, ...).
    pub environment: Option<String>,
    /// Business criticality label.
    pub criticality: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Health score included in list responses.
    pub current_health_score: Option<f64>,
    /// Health score merged from a dedicated health lookup.
    pub health_score: Option<f64>,
    /// Monitors attached to this service.
    #[serde(default)]
    pub service_monitors: Vec<ServiceMonitor>,
}

/// Health lookup response for a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Aggregate health score, 0-100. `None` means unknown.
    pub health_score: Option<f64>,
}

/// Partial monitor reference embedded in incidents and predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRef {
    /// Monitor identifier when included.
    pub id: Option<MonitorId>,
    /// Monitor name when included.
    pub name: Option<String>,
    /// Owning service when included.
    pub service_id: Option<ServiceId>,
}

// ============================================================================
// SECTION: Incidents and Predictions
// ============================================================================

/// A detected or ongoing operational problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Incident identifier.
    pub id: IncidentId,
    /// Incident title.
    pub title: Option<String>,
    /// Reported severity.
    #[serde(default)]
    pub severity: Severity,
    /// Alternate priority field used by some backend versions.
    pub priority: Option<Severity>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: IncidentStatus,
    /// Affected service when attributed directly.
    pub service_id: Option<ServiceId>,
    /// Affected monitor identifier.
    pub monitor_id: Option<MonitorId>,
    /// Affected monitor reference.
    pub monitor: Option<MonitorRef>,
    /// Moment the incident started.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    /// Moment the incident record was created.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Accumulated downtime in seconds, absent while ongoing.
    pub downtime_duration: Option<f64>,
    /// Error code observed by the failing check.
    pub error_code: Option<String>,
}

impl Incident {
    /// Returns true when the incident is not yet resolved or dismissed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true when either the severity or priority field is critical.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical || self.priority == Some(Severity::Critical)
    }

    /// Returns true when the incident is attributed to the given service,
    /// either directly or through its monitor.
    #[must_use]
    pub fn affects_service(&self, service: &ServiceId) -> bool {
        self.service_id.as_ref() == Some(service)
            || self
                .monitor
                .as_ref()
                .is_some_and(|monitor| monitor.service_id.as_ref() == Some(service))
    }

    /// Returns the best-known start moment (start time, else creation time).
    #[must_use]
    pub const fn started_at(&self) -> Option<OffsetDateTime> {
        match self.start_time {
            Some(start) => Some(start),
            None => self.created_at,
        }
    }
}

/// A forecast of a likely future incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Prediction identifier when included.
    pub id: Option<String>,
    /// Forecast category label (latency-degradation, cert-expiry, ...).
    #[serde(default)]
    pub prediction_type: String,
    /// Raw confidence, either a fraction in [0, 1] or a percentage.
    pub confidence: Option<f64>,
    /// Lifecycle status; absent means active.
    pub status: Option<PredictionStatus>,
    /// Service the forecast applies to.
    pub service_id: Option<ServiceId>,
    /// Monitor the forecast applies to.
    pub monitor_id: Option<MonitorId>,
    /// Monitor reference when included.
    pub monitor: Option<MonitorRef>,
    /// Forecast window label.
    pub time_window: Option<String>,
    /// Severity attributed to the forecast.
    pub severity: Option<Severity>,
}

impl Prediction {
    /// Returns true when the prediction is in effect (absent status counts
    /// as active).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_none_or(|status| status == PredictionStatus::Active)
    }

    /// Returns the best label for the forecast target: monitor name, else
    /// monitor id, else "unknown".
    #[must_use]
    pub fn target_label(&self) -> String {
        if let Some(name) = self.monitor.as_ref().and_then(|monitor| monitor.name.as_deref()) {
            return name.to_string();
        }
        self.monitor_id.as_ref().map_or_else(|| "unknown".to_string(), ToString::to_string)
    }
}

// ============================================================================
// SECTION: Deployments
// ============================================================================

/// Incident correlation attached to a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCorrelation {
    /// Correlation strength score.
    pub correlation_score: Option<f64>,
    /// Correlation confidence label.
    pub confidence: Option<String>,
}

/// A recorded release of a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Deployment identifier when included.
    pub id: Option<String>,
    /// Deployed service.
    pub service_id: Option<ServiceId>,
    /// Deployment pipeline status.
    pub deployment_status: Option<String>,
    /// Alternate status field used by some backend versions.
    pub status: Option<String>,
    /// Head commit message.
    pub commit_message: Option<String>,
    /// Head commit author.
    pub commit_author: Option<String>,
    /// Head commit SHA.
    pub commit_sha: Option<String>,
    /// Deployed branch.
    pub branch: Option<String>,
    /// Number of files changed.
    pub files_changed: Option<u64>,
    /// Moment the deployment finished.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deployed_at: Option<OffsetDateTime>,
    /// Incident correlations when requested.
    #[serde(default)]
    pub correlations: Vec<DeploymentCorrelation>,
}

// ============================================================================
// SECTION: Root-Cause Analyses
// ============================================================================

/// Timeline entry inside a detailed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaTimelineEntry {
    /// Event moment label.
    pub time: Option<String>,
    /// Event description.
    pub event: Option<String>,
}

/// Suspected code change inside a deploy analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaSuspectedLine {
    /// File the suspected change lives in.
    pub filename: Option<String>,
    /// Description of the change.
    pub change: Option<String>,
    /// Why the change is suspected.
    pub explanation: Option<String>,
    /// Suggested remediation.
    pub suggested_fix: Option<String>,
}

/// Deploy-correlation section of a detailed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaDeployAnalysis {
    /// Suspected code changes.
    #[serde(default)]
    pub suspected_lines: Vec<RcaSuspectedLine>,
}

/// Detailed analysis payload attached to an RCA.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaDetailedAnalysis {
    /// Reconstructed event timeline.
    #[serde(default)]
    pub timeline: Vec<RcaTimelineEntry>,
    /// Deploy-correlation details.
    pub deploy_analysis: Option<RcaDeployAnalysis>,
}

/// Suggested action attached to an RCA.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaAction {
    /// Urgency label.
    pub urgency: Option<String>,
    /// Action description.
    pub action: Option<String>,
}

/// Prevention recommendation attached to an RCA.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaRecommendation {
    /// Priority label.
    pub priority: Option<String>,
    /// Recommended action description.
    pub action: Option<String>,
}

/// A generated root-cause analysis for an incident or service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rca {
    /// Analysis identifier.
    pub id: Option<String>,
    /// One-line root cause summary.
    pub root_cause_summary: Option<String>,
    /// Root cause classification label.
    pub root_cause_type: Option<String>,
    /// Analysis confidence percentage.
    pub confidence_score: Option<f64>,
    /// Model used to generate the analysis.
    pub ai_model_used: Option<String>,
    /// Analysis wall-clock duration in milliseconds.
    pub analysis_duration_ms: Option<f64>,
    /// Whether a cascading failure was detected.
    #[serde(default)]
    pub cascade_detected: bool,
    /// Monitor at the origin of the cascade.
    pub cascade_origin_monitor_id: Option<String>,
    /// Number of monitors affected by the cascade.
    pub affected_monitors_count: Option<u64>,
    /// Number of services affected by the cascade.
    pub affected_services_count: Option<u64>,
    /// Correlated deployment when one was identified.
    pub correlated_deployment_id: Option<String>,
    /// Deploy correlation strength.
    pub deploy_correlation_score: Option<f64>,
    /// Detailed analysis payload.
    pub detailed_analysis: Option<RcaDetailedAnalysis>,
    /// Suggested remediation actions.
    #[serde(default)]
    pub suggested_actions: Vec<RcaAction>,
    /// Prevention recommendations.
    #[serde(default)]
    pub prevention_recommendations: Vec<RcaRecommendation>,
}

// ============================================================================
// SECTION: Executive Summaries
// ============================================================================

/// Aggregate metrics inside an executive summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    /// Fleet-wide health percentage.
    pub overall_health: Option<f64>,
    /// Total monitor count.
    pub total_monitors: Option<u64>,
    /// Monitors currently up.
    pub monitors_up: Option<u64>,
    /// Monitors currently degraded.
    pub monitors_degraded: Option<u64>,
    /// Monitors currently down.
    pub monitors_down: Option<u64>,
    /// Incidents opened in the period.
    pub incidents_in_period: Option<u64>,
    /// Predictions currently active.
    pub predictions_active: Option<u64>,
    /// Deployments in the period.
    pub deployments_in_period: Option<u64>,
}

/// Highlight entry inside an executive summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryHighlight {
    /// Highlight category label.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Highlight message.
    pub message: Option<String>,
}

/// Executive summary of infrastructure health over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    /// Narrative summary text.
    pub summary: Option<String>,
    /// Aggregate metrics.
    pub metrics: Option<SummaryMetrics>,
    /// Notable events in the period.
    #[serde(default)]
    pub highlights: Vec<SummaryHighlight>,
    /// Follow-up questions the agent may ask.
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

// ============================================================================
// SECTION: Monitor Metrics
// ============================================================================

/// Partial monitor record inside a metrics summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsMonitor {
    /// Monitor identifier when included.
    pub id: Option<MonitorId>,
    /// Monitor name when included.
    pub name: Option<String>,
    /// Monitor check type.
    #[serde(rename = "type", default)]
    pub kind: MonitorKind,
    /// Operational status when included.
    pub operational_status: Option<OperationalStatus>,
    /// Checked target when included.
    pub target: Option<String>,
}

/// Current-status section of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsCurrentStatus {
    /// Operational status at summary time.
    pub operational_status: Option<OperationalStatus>,
    /// Most recent response time in milliseconds.
    pub last_response_time: Option<f64>,
}

/// Response-time averages section of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeStats {
    /// Most recent response time in milliseconds.
    pub current: Option<f64>,
    /// 24-hour average.
    pub avg_day: Option<f64>,
    /// 7-day average.
    pub avg_week: Option<f64>,
    /// 30-day average.
    pub avg_month: Option<f64>,
    /// 365-day average.
    pub avg_year: Option<f64>,
}

/// Uptime percentages section of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStats {
    /// 24-hour uptime percentage.
    pub day: Option<f64>,
    /// 7-day uptime percentage.
    pub week: Option<f64>,
    /// 30-day uptime percentage.
    pub month: Option<f64>,
    /// 365-day uptime percentage.
    pub year: Option<f64>,
}

/// Check counts for one window of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckWindow {
    /// Total checks in the window.
    pub total: Option<u64>,
    /// Successful checks in the window.
    pub up: Option<u64>,
    /// Failed checks in the window.
    pub down: Option<u64>,
}

/// Check counts section of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStats {
    /// Last 24 hours.
    pub day: Option<CheckWindow>,
    /// Last 7 days.
    pub week: Option<CheckWindow>,
    /// Last 30 days.
    pub month: Option<CheckWindow>,
    /// Last 365 days.
    pub year: Option<CheckWindow>,
}

/// TLS certificate section of a metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCertificateInfo {
    /// Certificate status label.
    pub status: Option<String>,
    /// Certificate issuer.
    pub issuer: Option<String>,
    /// Expiry moment as reported.
    pub expires_at: Option<String>,
    /// Alternate expiry field used by some backend versions.
    pub valid_until: Option<String>,
    /// Days until expiry when precomputed by the backend.
    pub days_remaining: Option<i64>,
}

impl SslCertificateInfo {
    /// Returns the expiry string, preferring `expiresAt` over `validUntil`.
    #[must_use]
    pub fn expiry(&self) -> Option<&str> {
        self.expires_at.as_deref().or(self.valid_until.as_deref())
    }
}

/// Metrics summary for a single monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorMetricsSummary {
    /// Monitor record when nested under a `monitor` key.
    pub monitor: Option<MetricsMonitor>,
    /// Monitor fields when the backend inlines them at the top level.
    #[serde(flatten)]
    pub inline: MetricsMonitor,
    /// Current-status section.
    pub current_status: Option<MetricsCurrentStatus>,
    /// Response-time averages.
    pub response_time: Option<ResponseTimeStats>,
    /// Uptime percentages.
    pub uptime: Option<UptimeStats>,
    /// Check counts.
    pub checks: Option<CheckStats>,
    /// TLS certificate details.
    pub ssl_certificate: Option<SslCertificateInfo>,
}

impl MonitorMetricsSummary {
    /// Returns the monitor record, falling back to inlined top-level fields.
    #[must_use]
    pub const fn monitor_info(&self) -> &MetricsMonitor {
        match &self.monitor {
            Some(monitor) => monitor,
            None => &self.inline,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
