// crates/pulsegate-core/src/risk.rs
// ============================================================================
// Module: Deploy-Safety Risk Classification
// Description: Multi-signal risk aggregation for deploy-safety verdicts.
// Purpose: Fold incidents, predictions, and health into one verdict.
// Dependencies: pulsegate-core::model
// ============================================================================

//! ## Overview
//! The classifier is a pure function from aggregated signals to a risk
//! verdict. Rules are applied in a fixed order and can only raise the risk
//! level, never lower it, so the final verdict is independent of the order
//! in which evidence arrived.
//!
//! ## Invariants
//! - `RiskLevel` ordering is low < medium < high and is monotone
//!   non-decreasing as rules are folded in.
//! - `safe` is false exactly when the level is high; medium is cautionary,
//!   not blocking.
//! - Classification performs no I/O and reads no clocks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::model::Incident;
use crate::model::Prediction;
use crate::model::ServiceId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Normalized confidence at or above which a prediction blocks deploys.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 80.0;
/// Normalized confidence at or above which a prediction is cautionary.
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 60.0;
/// Health score below which a service blocks deploys.
pub const HEALTH_BLOCKING_THRESHOLD: f64 = 70.0;
/// Health score below which a service is cautionary.
pub const HEALTH_CAUTION_THRESHOLD: f64 = 85.0;
/// Verdict label used when no specific service was resolved.
pub const GENERIC_TARGET_LABEL: &str = "your infrastructure";

// ============================================================================
// SECTION: Confidence Normalization
// ============================================================================

/// Normalizes a raw confidence value to the 0-100 percentage scale.
///
/// Backends report confidence either as a fraction in [0, 1] or as a
/// percentage; values at or below 1 are scaled by 100. A genuine 100%
/// expressed as `1.0` lands on 100 either way, which keeps the heuristic
/// idempotent for every value above 1.
#[must_use]
pub fn normalize_confidence(raw: f64) -> f64 {
    if raw <= 1.0 { raw * 100.0 } else { raw }
}

// ============================================================================
// SECTION: Signal Filtering
// ============================================================================

/// Aggregated signals for one deploy-safety check.
///
/// Produced by the signal aggregator after per-branch soft-failure handling:
/// a failed health lookup yields `None`, failed list fetches yield empty
/// lists. The classifier treats the three fields as independent evidence.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSignals {
    /// Health score of the resolved service, when known.
    pub health_score: Option<f64>,
    /// Active predictions scoped to the check target.
    pub predictions: Vec<Prediction>,
    /// Active incidents scoped to the check target.
    pub incidents: Vec<Incident>,
}

/// Restricts predictions to active ones, optionally scoped to a service.
#[must_use]
pub fn active_predictions(
    predictions: Vec<Prediction>,
    service: Option<&ServiceId>,
) -> Vec<Prediction> {
    predictions
        .into_iter()
        .filter(Prediction::is_active)
        .filter(|prediction| {
            service.is_none_or(|service_id| prediction.service_id.as_ref() == Some(service_id))
        })
        .collect()
}

/// Restricts incidents to active ones, optionally scoped to a service.
///
/// An incident is in scope when attributed to the service directly or
/// through its monitor.
#[must_use]
pub fn active_incidents(incidents: Vec<Incident>, service: Option<&ServiceId>) -> Vec<Incident> {
    incidents
        .into_iter()
        .filter(Incident::is_active)
        .filter(|incident| service.is_none_or(|service_id| incident.affects_service(service_id)))
        .collect()
}

// ============================================================================
// SECTION: Verdict Types
// ============================================================================

/// Risk level of a deploy-safety verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    /// No active evidence against deploying.
    #[default]
    Low,
    /// Cautionary evidence; deploying is allowed with extra monitoring.
    Medium,
    /// Blocking evidence; deploying is advised against.
    High,
}

impl RiskLevel {
    /// Returns the canonical label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Raises the level to at least `floor`; never lowers it.
    pub fn raise(&mut self, floor: Self) {
        if floor > *self {
            *self = floor;
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deploy recommendation derived from the final risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Deploy freely.
    Proceed,
    /// Deploy, but watch the rollout closely.
    ProceedWithCaution,
    /// Hold the deploy and keep monitoring.
    WaitAndMonitor,
}

impl Recommendation {
    /// Returns the canonical label for the recommendation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::ProceedWithCaution => "proceed_with_caution",
            Self::WaitAndMonitor => "wait_and_monitor",
        }
    }

    /// Maps a final risk level to its recommendation.
    #[must_use]
    pub const fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Self::Proceed,
            RiskLevel::Medium => Self::ProceedWithCaution,
            RiskLevel::High => Self::WaitAndMonitor,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an active issue in a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Backed by an incident.
    Incident,
    /// Backed by a prediction.
    Prediction,
    /// Backed by the health score.
    Health,
}

impl IssueKind {
    /// Returns the canonical label for the issue kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Prediction => "prediction",
            Self::Health => "health",
        }
    }
}

/// One piece of evidence attached to a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveIssue {
    /// Evidence category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// Rounded normalized confidence for prediction-backed issues.
    pub confidence: Option<f64>,
}

/// Deploy-safety verdict.
///
/// Recomputed fresh on every invocation; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    /// True unless the risk level is high.
    pub safe: bool,
    /// Final risk level.
    pub risk_level: RiskLevel,
    /// Templated one-sentence explanation.
    pub reason: String,
    /// Deploy recommendation.
    pub recommendation: Recommendation,
    /// Evidence entries, in rule order.
    pub active_issues: Vec<ActiveIssue>,
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Returns a prediction's normalized confidence, defaulting absent to 0.
fn confidence_pct(prediction: &Prediction) -> f64 {
    prediction.confidence.map_or(0.0, normalize_confidence)
}

/// Classifies aggregated signals into a deploy-safety verdict.
///
/// Rules are applied in a fixed order, each raising the risk level
/// monotonically: critical incidents, other active incidents,
/// high-confidence predictions, medium-confidence predictions, health score.
/// `target_label` parameterizes the reason sentence; pass
/// [`GENERIC_TARGET_LABEL`] when no specific service was resolved.
#[must_use]
pub fn classify(signals: &AggregatedSignals, target_label: &str) -> RiskAssessment {
    let mut level = RiskLevel::Low;
    let mut issues: Vec<ActiveIssue> = Vec::new();

    for incident in signals.incidents.iter().filter(|incident| incident.is_critical()) {
        level.raise(RiskLevel::High);
        issues.push(ActiveIssue {
            kind: IssueKind::Incident,
            message: format!(
                "Critical incident: {} ({})",
                incident.title.as_deref().unwrap_or("Unknown"),
                incident.status
            ),
            confidence: None,
        });
    }

    for incident in signals.incidents.iter().filter(|incident| !incident.is_critical()) {
        level.raise(RiskLevel::Medium);
        issues.push(ActiveIssue {
            kind: IssueKind::Incident,
            message: format!(
                "Active incident: {} ({})",
                incident.title.as_deref().unwrap_or("Unknown"),
                incident.severity
            ),
            confidence: None,
        });
    }

    for prediction in &signals.predictions {
        let confidence = confidence_pct(prediction);
        if confidence >= HIGH_CONFIDENCE_THRESHOLD {
            level.raise(RiskLevel::High);
        } else if confidence >= MEDIUM_CONFIDENCE_THRESHOLD {
            level.raise(RiskLevel::Medium);
        } else {
            continue;
        }
        issues.push(ActiveIssue {
            kind: IssueKind::Prediction,
            message: format!("{}: {}", prediction.prediction_type, prediction.target_label()),
            confidence: Some(confidence.round()),
        });
    }

    if let Some(score) = signals.health_score {
        if score < HEALTH_BLOCKING_THRESHOLD {
            level.raise(RiskLevel::High);
            issues.push(ActiveIssue {
                kind: IssueKind::Health,
                message: format!("Service health score is {score:.1}% (below 70% threshold)"),
                confidence: None,
            });
        } else if score < HEALTH_CAUTION_THRESHOLD {
            level.raise(RiskLevel::Medium);
            issues.push(ActiveIssue {
                kind: IssueKind::Health,
                message: format!("Service health score is {score:.1}% (below 85%)"),
                confidence: None,
            });
        }
    }

    let safe = level != RiskLevel::High;
    let reason = match level {
        RiskLevel::Low => {
            format!("{target_label} is stable with no active issues. Safe to deploy.")
        }
        RiskLevel::Medium => {
            format!("{target_label} has minor issues. Deploy with caution and monitor closely.")
        }
        RiskLevel::High => {
            format!("{target_label} has critical issues. Deploying now could worsen the situation.")
        }
    };

    RiskAssessment {
        safe,
        risk_level: level,
        reason,
        recommendation: Recommendation::for_level(level),
        active_issues: issues,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        reason = "Test-only assertions compare exact constants."
    )]

    use serde_json::json;

    use super::*;

    fn incident(severity: &str, status: &str) -> Incident {
        serde_json::from_value(json!({
            "id": "inc-1",
            "title": "Database latency spike",
            "severity": severity,
            "status": status,
        }))
        .unwrap()
    }

    fn prediction(confidence: f64) -> Prediction {
        serde_json::from_value(json!({
            "predictionType": "latency-degradation",
            "confidence": confidence,
            "monitor": {"name": "checkout-db"},
        }))
        .unwrap()
    }

    #[test]
    fn normalization_scales_fractions_and_keeps_percentages() {
        assert_eq!(normalize_confidence(0.65), 65.0);
        assert_eq!(normalize_confidence(65.0), 65.0);
        assert_eq!(normalize_confidence(1.0), 100.0);
        assert_eq!(normalize_confidence(normalize_confidence(0.65)), 65.0);
    }

    #[test]
    fn critical_incident_blocks_deploys() {
        let signals = AggregatedSignals {
            health_score: None,
            predictions: Vec::new(),
            incidents: vec![incident("critical", "investigating")],
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert!(!verdict.safe);
        assert_eq!(verdict.recommendation, Recommendation::WaitAndMonitor);
        assert_eq!(verdict.active_issues.len(), 1);
        assert_eq!(verdict.active_issues[0].kind, IssueKind::Incident);
        assert!(verdict.active_issues[0].message.contains("investigating"));
    }

    #[test]
    fn medium_confidence_prediction_is_cautionary_not_blocking() {
        let signals = AggregatedSignals {
            health_score: Some(90.0),
            predictions: vec![prediction(0.65)],
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
        assert!(verdict.safe);
        assert_eq!(verdict.recommendation, Recommendation::ProceedWithCaution);
        assert_eq!(verdict.active_issues[0].confidence, Some(65.0));
        assert_eq!(verdict.active_issues[0].message, "latency-degradation: checkout-db");
    }

    #[test]
    fn low_health_score_blocks_deploys() {
        let signals = AggregatedSignals {
            health_score: Some(60.0),
            predictions: Vec::new(),
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert!(!verdict.safe);
        assert!(verdict.active_issues[0].message.contains("below 70% threshold"));
    }

    #[test]
    fn health_between_thresholds_is_cautionary() {
        let signals = AggregatedSignals {
            health_score: Some(80.0),
            predictions: Vec::new(),
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
        assert!(verdict.safe);
        assert!(verdict.active_issues[0].message.contains("below 85%"));
    }

    #[test]
    fn unknown_health_is_not_penalized() {
        let signals = AggregatedSignals::default();
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert!(verdict.safe);
        assert_eq!(verdict.recommendation, Recommendation::Proceed);
        assert!(verdict.active_issues.is_empty());
        assert_eq!(
            verdict.reason,
            "your infrastructure is stable with no active issues. Safe to deploy."
        );
    }

    #[test]
    fn healthy_score_raises_nothing() {
        let signals = AggregatedSignals {
            health_score: Some(99.2),
            predictions: Vec::new(),
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert!(verdict.active_issues.is_empty());
    }

    #[test]
    fn later_rules_never_lower_raised_risk() {
        let signals = AggregatedSignals {
            health_score: Some(99.0),
            predictions: vec![prediction(0.65)],
            incidents: vec![incident("critical", "detecting")],
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert!(!verdict.safe);
    }

    #[test]
    fn non_critical_incident_raises_to_medium() {
        let signals = AggregatedSignals {
            health_score: None,
            predictions: Vec::new(),
            incidents: vec![incident("medium", "investigating")],
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
        assert!(verdict.safe);
        assert!(verdict.active_issues[0].message.starts_with("Active incident:"));
    }

    #[test]
    fn high_confidence_prediction_blocks_deploys() {
        let signals = AggregatedSignals {
            health_score: Some(95.0),
            predictions: vec![prediction(0.83)],
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert_eq!(verdict.active_issues[0].confidence, Some(83.0));
    }

    #[test]
    fn low_confidence_prediction_is_ignored() {
        let signals = AggregatedSignals {
            health_score: None,
            predictions: vec![prediction(0.40)],
            incidents: Vec::new(),
        };
        let verdict = classify(&signals, "Checkout API");
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert!(verdict.active_issues.is_empty());
    }

    #[test]
    fn active_prediction_filter_scopes_by_service() {
        let scoped: Prediction = serde_json::from_value(json!({
            "predictionType": "cert-expiry",
            "serviceId": "svc-1",
        }))
        .unwrap();
        let other: Prediction = serde_json::from_value(json!({
            "predictionType": "cert-expiry",
            "serviceId": "svc-2",
        }))
        .unwrap();
        let inactive: Prediction = serde_json::from_value(json!({
            "predictionType": "cert-expiry",
            "serviceId": "svc-1",
            "status": "expired",
        }))
        .unwrap();
        let service = ServiceId::new("svc-1");
        let kept = active_predictions(vec![scoped, other, inactive], Some(&service));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].service_id.as_ref().map(ServiceId::as_str), Some("svc-1"));
    }

    #[test]
    fn active_incident_filter_drops_resolved_and_out_of_scope() {
        let resolved = incident("high", "resolved");
        let other_service: Incident = serde_json::from_value(json!({
            "id": "inc-9",
            "status": "detecting",
            "serviceId": "svc-2",
        }))
        .unwrap();
        let service = ServiceId::new("svc-1");
        let mut scoped = incident("high", "investigating");
        scoped.service_id = Some(service.clone());
        let kept = active_incidents(vec![scoped, resolved, other_service], Some(&service));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.as_str(), "inc-1");
    }

    #[test]
    fn unscoped_filters_keep_all_active_entries() {
        let incidents =
            active_incidents(vec![incident("low", "detecting"), incident("low", "resolved")], None);
        assert_eq!(incidents.len(), 1);
    }

    #[test]
    fn safety_coupling_holds_across_levels() {
        let cases = [
            (AggregatedSignals::default(), true),
            (
                AggregatedSignals {
                    health_score: Some(80.0),
                    predictions: Vec::new(),
                    incidents: Vec::new(),
                },
                true,
            ),
            (
                AggregatedSignals {
                    health_score: Some(50.0),
                    predictions: Vec::new(),
                    incidents: Vec::new(),
                },
                false,
            ),
        ];
        for (signals, expected_safe) in cases {
            let verdict = classify(&signals, GENERIC_TARGET_LABEL);
            assert_eq!(verdict.safe, expected_safe);
            assert_eq!(verdict.safe, verdict.risk_level != RiskLevel::High);
        }
    }
}
