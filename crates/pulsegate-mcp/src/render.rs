// crates/pulsegate-mcp/src/render.rs
// ============================================================================
// Module: Result Rendering
// Description: Compact text rendering of backend payloads for LLM agents.
// Purpose: Convert typed payloads into the tool-result text surface.
// Dependencies: pulsegate-core, time
// ============================================================================

//! ## Overview
//! Renderers convert typed backend payloads into concise plain text for
//! agent consumption. Long lists are truncated with an explicit `... and N
//! more` marker, unknown numbers render as `N/A`, and status words map to
//! bracketed icons so an agent can scan state at a glance. Renderers take
//! the current time as a parameter; nothing here reads a clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use pulsegate_core::Deployment;
use pulsegate_core::ExecutiveSummary;
use pulsegate_core::Incident;
use pulsegate_core::Monitor;
use pulsegate_core::MonitorStatus;
use pulsegate_core::OperationalStatus;
use pulsegate_core::Prediction;
use pulsegate_core::Rca;
use pulsegate_core::RiskAssessment;
use pulsegate_core::RiskLevel;
use pulsegate_core::Service;
use pulsegate_core::model::MonitorMetricsSummary;
use pulsegate_core::normalize_confidence;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Scalar Helpers
// ============================================================================

/// Maps a status word to its bracketed icon.
fn status_icon(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "up" | "active" | "healthy" | "resolved" => "[UP]".to_string(),
        "degraded" | "warning" | "caution" => "[DEGRADED]".to_string(),
        "down" | "critical" | "detecting" | "investigating" => "[DOWN]".to_string(),
        "paused" => "[PAUSED]".to_string(),
        "maintenance" => "[MAINTENANCE]".to_string(),
        "" => "[UNKNOWN]".to_string(),
        other => format!("[{}]", other.to_uppercase()),
    }
}

/// Maps a priority word to its bracketed label.
fn priority_label(priority: Option<&str>) -> String {
    format!("[{}]", priority.unwrap_or("unknown").to_uppercase())
}

/// Renders an optional percentage with one decimal place.
fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| format!("{value:.1}%"))
}

/// Renders an optional duration in whole milliseconds.
fn millis(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| format!("{value:.0}ms"))
}

/// Renders an optional normalized confidence as a whole percentage.
fn confidence_pct(raw: Option<f64>) -> String {
    raw.map_or_else(|| "N/A".to_string(), |raw| format!("{:.0}%", normalize_confidence(raw)))
}

/// Renders how long ago a moment was, in minutes, hours, or days.
fn ago(moment: Option<OffsetDateTime>, now: OffsetDateTime) -> String {
    let Some(moment) = moment else {
        return "N/A".to_string();
    };
    let minutes = (now - moment).whole_minutes().max(0);
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Renders up to `max` items, appending a marker for what was cut.
fn truncate_list<T>(items: &[T], max: usize, render: impl Fn(&T) -> String) -> String {
    let mut shown: Vec<String> = items.iter().take(max).map(render).collect();
    if items.len() > max {
        shown.push(format!("... and {} more", items.len() - max));
    }
    shown.join("\n")
}

/// Truncates free text to a character budget.
fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

// ============================================================================
// SECTION: Service Renderers
// ============================================================================

/// Renders the full service list with per-service monitor rollups.
#[must_use]
pub fn render_service_list(services: &[Service]) -> String {
    if services.is_empty() {
        return "No services found.".to_string();
    }
    let total_monitors: usize =
        services.iter().map(|service| service.service_monitors.len()).sum();
    let header = format!("{} services ({total_monitors} monitors total):\n\n", services.len());
    let body = truncate_list(services, 20, |service| {
        let health = service
            .current_health_score
            .map_or_else(String::new, |score| format!(" | Health: {}", pct(Some(score))));
        let monitor_count = if service.service_monitors.is_empty() {
            String::new()
        } else {
            format!(" | {} monitors", service.service_monitors.len())
        };
        let mut line = format!(
            "- {} ({}){health}{monitor_count} | {} criticality\n  ID: {}",
            service.name,
            service.environment.as_deref().unwrap_or("unknown"),
            service.criticality.as_deref().unwrap_or("normal"),
            service.id
        );
        for entry in &service.service_monitors {
            let monitor = entry.monitor();
            let icon = status_icon(
                monitor
                    .operational_status
                    .map_or_else(|| monitor.status.as_str(), OperationalStatus::as_str),
            );
            line.push_str(&format!("\n    {icon} {} ({})", monitor.name, monitor.kind));
        }
        line
    });
    header + &body
}

/// Renders a single service with its monitors.
#[must_use]
pub fn render_service_status(service: &Service) -> String {
    let mut text = format!("Service: {}\n", service.name);
    text.push_str(&format!(
        "Environment: {} | Criticality: {}\n",
        service.environment.as_deref().unwrap_or("unknown"),
        service.criticality.as_deref().unwrap_or("normal")
    ));
    if service.health_score.is_some() {
        text.push_str(&format!("Health Score: {}\n", pct(service.health_score)));
    }
    if let Some(description) = &service.description {
        text.push_str(&format!("Description: {description}\n"));
    }
    if !service.service_monitors.is_empty() {
        text.push_str(&format!("\nMonitors ({}):\n", service.service_monitors.len()));
        text.push_str(&truncate_list(&service.service_monitors, 15, |entry| {
            let monitor = entry.monitor();
            let icon = status_icon(
                monitor
                    .operational_status
                    .map_or_else(|| monitor.status.as_str(), OperationalStatus::as_str),
            );
            format!(
                "  {icon} {} ({}) | Response: {} | Uptime: {}",
                monitor.name,
                monitor.kind,
                millis(monitor.response_time),
                pct(monitor.uptime_percentage)
            )
        }));
    }
    text
}

// ============================================================================
// SECTION: Prediction and Incident Renderers
// ============================================================================

/// Renders the active prediction list.
#[must_use]
pub fn render_predictions(predictions: &[Prediction]) -> String {
    if predictions.is_empty() {
        return "No active predictions.".to_string();
    }
    let header = format!("{} active predictions:\n\n", predictions.len());
    let body = truncate_list(predictions, 10, |prediction| {
        let label = prediction.severity.map_or_else(
            || priority_label(Some(prediction.prediction_type.as_str())),
            |severity| priority_label(Some(severity.as_str())),
        );
        format!(
            "- {label} {} | Monitor: {} | Confidence: {} | Window: {}",
            prediction.prediction_type,
            prediction.target_label(),
            confidence_pct(prediction.confidence),
            prediction.time_window.as_deref().unwrap_or("N/A")
        )
    });
    header + &body
}

/// Renders the incident list with attached root-cause analyses.
#[must_use]
pub fn render_incidents(
    incidents: &[Incident],
    rcas: &BTreeMap<String, Rca>,
    now: OffsetDateTime,
) -> String {
    if incidents.is_empty() {
        return "No incidents found.".to_string();
    }
    let header = format!("{} incidents:\n\n", incidents.len());
    let body = truncate_list(incidents, 10, |incident| {
        let duration = incident
            .downtime_duration
            .map_or_else(|| "ongoing".to_string(), |seconds| format!("{:.0}min", seconds / 60.0));
        let monitor = incident
            .monitor
            .as_ref()
            .and_then(|monitor| monitor.name.clone())
            .or_else(|| incident.monitor_id.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        let mut text = format!(
            "- {} {} {}\n",
            status_icon(incident.status.as_str()),
            priority_label(Some(incident.severity.as_str())),
            incident.title.as_deref().unwrap_or("Untitled")
        );
        text.push_str(&format!(
            "  ID: {} | Monitor: {monitor} | Duration: {duration} | Started: {}",
            incident.id,
            ago(incident.started_at(), now)
        ));
        if let Some(error_code) = &incident.error_code {
            text.push_str(&format!(" | Error: {error_code}"));
        }
        if let Some(rca) = rcas.get(incident.id.as_str()) {
            text.push_str(&format!(
                "\n  RCA: {} ({}, confidence: {})",
                rca.root_cause_summary.as_deref().unwrap_or("N/A"),
                rca.root_cause_type.as_deref().unwrap_or("unknown"),
                pct(rca.confidence_score)
            ));
            if rca.cascade_detected {
                text.push_str(" [CASCADE]");
            }
            if rca.correlated_deployment_id.is_some() {
                text.push_str(" [DEPLOY-RELATED]");
            }
        }
        text
    });
    header + &body
}

/// Renders detailed health for a single monitor.
#[must_use]
pub fn render_monitor_health(monitor: &Monitor, predictions: &[Prediction]) -> String {
    let status = monitor
        .operational_status
        .map_or_else(|| monitor.status.as_str(), OperationalStatus::as_str);
    let mut text = format!("Monitor: {}\n", monitor.name);
    text.push_str(&format!("ID: {}\n", monitor.id));
    text.push_str(&format!(
        "Type: {} | Status: {} {status}\n",
        monitor.kind,
        status_icon(status)
    ));
    text.push_str(&format!(
        "Response Time: {} | Uptime: {}\n",
        millis(monitor.response_time),
        pct(monitor.uptime_percentage)
    ));
    if let Some(target) = &monitor.target {
        text.push_str(&format!("Target: {target}\n"));
    }
    if !predictions.is_empty() {
        text.push_str(&format!("\nActive Predictions ({}):\n", predictions.len()));
        text.push_str(&truncate_list(predictions, 5, |prediction| {
            format!(
                "  - {} | Confidence: {} | Window: {}",
                prediction.prediction_type,
                confidence_pct(prediction.confidence),
                prediction.time_window.as_deref().unwrap_or("N/A")
            )
        }));
    }
    text
}

// ============================================================================
// SECTION: Deployment and RCA Renderers
// ============================================================================

/// Renders the recent deployment list with incident correlations.
#[must_use]
pub fn render_deployments(deployments: &[Deployment], now: OffsetDateTime) -> String {
    if deployments.is_empty() {
        return "No recent deployments.".to_string();
    }
    let header = format!("{} deployments:\n\n", deployments.len());
    let body = truncate_list(deployments, 15, |deployment| {
        let status = deployment
            .deployment_status
            .as_deref()
            .or(deployment.status.as_deref())
            .unwrap_or("unknown");
        let message = clip(deployment.commit_message.as_deref().unwrap_or(""), 80);
        let mut text = format!(
            "- {} {message} ({})\n",
            status_icon(status),
            deployment.branch.as_deref().unwrap_or("N/A")
        );
        text.push_str(&format!(
            "  Author: {} | SHA: {} | {}",
            deployment.commit_author.as_deref().unwrap_or("unknown"),
            clip(deployment.commit_sha.as_deref().unwrap_or(""), 8),
            ago(deployment.deployed_at, now)
        ));
        if let Some(files_changed) = deployment.files_changed {
            text.push_str(&format!(" | {files_changed} files"));
        }
        if !deployment.correlations.is_empty() {
            let entries: Vec<String> = deployment
                .correlations
                .iter()
                .map(|correlation| {
                    format!(
                        "score={} ({})",
                        correlation
                            .correlation_score
                            .map_or_else(|| "N/A".to_string(), |score| score.to_string()),
                        correlation.confidence.as_deref().unwrap_or("unknown")
                    )
                })
                .collect();
            text.push_str(&format!("\n  Correlations: {}", entries.join(", ")));
        }
        text
    });
    header + &body
}

/// Renders a root-cause analysis report.
#[must_use]
pub fn render_rca(rca: &Rca) -> String {
    let mut text = String::from("Root Cause Analysis\n");
    text.push_str(&"=".repeat(40));
    text.push_str("\n\n");
    text.push_str(&format!("RCA ID: {}\n", rca.id.as_deref().unwrap_or("N/A")));
    text.push_str(&format!(
        "Summary: {}\n",
        rca.root_cause_summary.as_deref().unwrap_or("N/A")
    ));
    text.push_str(&format!(
        "Type: {} | Confidence: {}\n",
        rca.root_cause_type.as_deref().unwrap_or("unknown"),
        pct(rca.confidence_score)
    ));
    let duration = rca
        .analysis_duration_ms
        .map_or_else(|| "N/A".to_string(), |duration| format!("{:.0}s", duration / 1000.0));
    text.push_str(&format!(
        "Model: {} | Duration: {duration}\n",
        rca.ai_model_used.as_deref().unwrap_or("unknown")
    ));

    if rca.cascade_detected {
        text.push_str(&format!(
            "\nCascade Detected: Yes | Origin: {}",
            rca.cascade_origin_monitor_id.as_deref().unwrap_or("unknown")
        ));
        text.push_str(&format!(
            " | Affected: {} monitors, {} services\n",
            rca.affected_monitors_count.unwrap_or(0),
            rca.affected_services_count.unwrap_or(0)
        ));
    }

    if rca.correlated_deployment_id.is_some() {
        text.push_str(&format!(
            "\nDeploy Correlated: Yes | Score: {}\n",
            rca.deploy_correlation_score
                .map_or_else(|| "N/A".to_string(), |score| score.to_string())
        ));
    }

    if let Some(analysis) = &rca.detailed_analysis {
        if !analysis.timeline.is_empty() {
            text.push_str("\nTimeline:\n");
            text.push_str(&truncate_list(&analysis.timeline, 8, |entry| {
                format!(
                    "  {}: {}",
                    entry.time.as_deref().unwrap_or("N/A"),
                    entry.event.as_deref().unwrap_or("N/A")
                )
            }));
        }
        if let Some(deploy_analysis) = &analysis.deploy_analysis
            && !deploy_analysis.suspected_lines.is_empty()
        {
            text.push_str("\n\nSuspected Code Changes:\n");
            text.push_str(&truncate_list(&deploy_analysis.suspected_lines, 5, |line| {
                format!(
                    "  - {}: {}\n    Why: {}\n    Fix: {}",
                    line.filename.as_deref().unwrap_or("N/A"),
                    line.change.as_deref().unwrap_or("N/A"),
                    line.explanation.as_deref().unwrap_or("N/A"),
                    line.suggested_fix.as_deref().unwrap_or("N/A")
                )
            }));
        }
    }

    if !rca.suggested_actions.is_empty() {
        text.push_str("\n\nSuggested Actions:\n");
        text.push_str(&truncate_list(&rca.suggested_actions, 5, |action| {
            format!(
                "  [{}] {}",
                action.urgency.as_deref().unwrap_or("unknown"),
                action.action.as_deref().unwrap_or("N/A")
            )
        }));
    }

    if !rca.prevention_recommendations.is_empty() {
        text.push_str("\n\nPrevention:\n");
        text.push_str(&truncate_list(&rca.prevention_recommendations, 5, |entry| {
            format!(
                "  [{}] {}",
                entry.priority.as_deref().unwrap_or("unknown"),
                entry.action.as_deref().unwrap_or("N/A")
            )
        }));
    }

    text
}

// ============================================================================
// SECTION: Verdict and Summary Renderers
// ============================================================================

/// Renders a deploy-safety verdict.
#[must_use]
pub fn render_safety_check(verdict: &RiskAssessment) -> String {
    let icon = match verdict.risk_level {
        RiskLevel::Low => "[SAFE]",
        RiskLevel::Medium => "[CAUTION]",
        RiskLevel::High => "[UNSAFE]",
    };
    let mut text = format!("{icon} Deploy Safety Check\n\n");
    text.push_str(&format!("Risk Level: {}\n", verdict.risk_level));
    text.push_str(&format!("Recommendation: {}\n\n", verdict.recommendation));
    text.push_str(&format!("{}\n", verdict.reason));
    if !verdict.active_issues.is_empty() {
        text.push_str("\nActive Issues:\n");
        text.push_str(&truncate_list(&verdict.active_issues, 10, |issue| {
            let confidence = issue
                .confidence
                .map_or_else(String::new, |confidence| {
                    format!(" (confidence: {confidence:.0}%)")
                });
            format!("  - [{}] {}{confidence}", issue.kind.as_str(), issue.message)
        }));
    }
    text
}

/// Renders an executive summary.
#[must_use]
pub fn render_executive_summary(summary: &ExecutiveSummary) -> String {
    let mut text =
        summary.summary.clone().unwrap_or_else(|| "No summary available.".to_string());
    if let Some(metrics) = &summary.metrics {
        text.push_str("\n\nMetrics:\n");
        text.push_str(&format!("  Overall Health: {}\n", pct(metrics.overall_health)));
        text.push_str(&format!(
            "  Monitors: {} total ({} up, {} degraded, {} down)\n",
            metrics.total_monitors.unwrap_or(0),
            metrics.monitors_up.unwrap_or(0),
            metrics.monitors_degraded.unwrap_or(0),
            metrics.monitors_down.unwrap_or(0)
        ));
        text.push_str(&format!(
            "  Incidents: {} | Predictions: {} | Deployments: {}",
            metrics.incidents_in_period.unwrap_or(0),
            metrics.predictions_active.unwrap_or(0),
            metrics.deployments_in_period.unwrap_or(0)
        ));
    }
    if !summary.highlights.is_empty() {
        text.push_str("\n\nHighlights:\n");
        text.push_str(&truncate_list(&summary.highlights, 5, |highlight| {
            format!(
                "  - [{}] {}",
                highlight.kind.as_deref().unwrap_or("info"),
                highlight.message.as_deref().unwrap_or("")
            )
        }));
    }
    if !summary.suggested_questions.is_empty() {
        text.push_str("\n\nSuggested Questions:\n");
        let questions: Vec<String> = summary
            .suggested_questions
            .iter()
            .map(|question| format!("  - {question}"))
            .collect();
        text.push_str(&questions.join("\n"));
    }
    text
}

// ============================================================================
// SECTION: Monitor Renderers
// ============================================================================

/// Sort rank for the monitor list: failing first, healthy last.
fn monitor_rank(monitor: &Monitor) -> u8 {
    match monitor.effective_status() {
        "down" => 0,
        "degraded" => 1,
        "paused" => 2,
        "maintenance" => 3,
        "up" => 4,
        _ => 5,
    }
}

/// Renders the monitor list with status and type rollups.
#[must_use]
pub fn render_monitors(monitors: &[Monitor]) -> String {
    if monitors.is_empty() {
        return "No monitors found.".to_string();
    }
    let mut status_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for monitor in monitors {
        *status_counts.entry(monitor.effective_status()).or_default() += 1;
        *type_counts.entry(monitor.kind.as_str()).or_default() += 1;
    }
    let status_parts: Vec<String> =
        status_counts.iter().map(|(status, count)| format!("{count} {status}")).collect();
    let type_parts: Vec<String> =
        type_counts.iter().map(|(kind, count)| format!("{count} {kind}")).collect();

    let mut sorted: Vec<&Monitor> = monitors.iter().collect();
    sorted.sort_by_key(|monitor| monitor_rank(monitor));

    let mut text = format!("{} monitors ({}):\n", monitors.len(), status_parts.join(", "));
    text.push_str(&format!("By type: {}\n\n", type_parts.join(", ")));
    text.push_str(&truncate_list(&sorted, 20, |monitor| {
        let icon = match monitor.status {
            MonitorStatus::Paused => status_icon("paused"),
            MonitorStatus::Maintenance => status_icon("maintenance"),
            MonitorStatus::Active | MonitorStatus::Unknown => status_icon(
                monitor.operational_status.map_or("unknown", OperationalStatus::as_str),
            ),
        };
        format!(
            "- {icon} {} ({}) | Response: {} | Uptime: {}\n  ID: {}",
            monitor.name,
            monitor.kind,
            millis(monitor.response_time),
            pct(monitor.uptime_percentage),
            monitor.id
        )
    }));
    text
}

/// Renders a detailed metrics summary for a monitor.
#[must_use]
pub fn render_monitor_metrics(summary: &MonitorMetricsSummary, now: OffsetDateTime) -> String {
    let monitor = summary.monitor_info();
    let status = summary
        .current_status
        .as_ref()
        .and_then(|current| current.operational_status)
        .or(monitor.operational_status)
        .map_or("unknown", OperationalStatus::as_str);
    let mut text = format!(
        "Monitor: {} ({})\n",
        monitor.name.as_deref().unwrap_or("Unknown"),
        monitor.kind
    );
    text.push_str(&format!(
        "Status: {} | Target: {}\n",
        status_icon(status),
        monitor.target.as_deref().unwrap_or("N/A")
    ));
    text.push_str(&format!(
        "ID: {}\n",
        monitor.id.as_ref().map_or_else(|| "N/A".to_string(), ToString::to_string)
    ));

    let response_current = summary
        .response_time
        .as_ref()
        .and_then(|stats| stats.current)
        .or_else(|| {
            summary.current_status.as_ref().and_then(|current| current.last_response_time)
        });
    let stats = summary.response_time.as_ref();
    text.push_str("\nResponse Time:\n");
    text.push_str(&format!(
        "  Current: {} | Day avg: {} | Week avg: {} | Month avg: {} | Year avg: {}\n",
        millis(response_current),
        millis(stats.and_then(|stats| stats.avg_day)),
        millis(stats.and_then(|stats| stats.avg_week)),
        millis(stats.and_then(|stats| stats.avg_month)),
        millis(stats.and_then(|stats| stats.avg_year))
    ));

    let uptime = summary.uptime.as_ref();
    text.push_str("\nUptime:\n");
    text.push_str(&format!(
        "  Day: {} | Week: {} | Month: {} | Year: {}\n",
        pct(uptime.and_then(|uptime| uptime.day)),
        pct(uptime.and_then(|uptime| uptime.week)),
        pct(uptime.and_then(|uptime| uptime.month)),
        pct(uptime.and_then(|uptime| uptime.year))
    ));

    if let Some(checks) = &summary.checks {
        let windows = [
            ("Last 24h", &checks.day),
            ("Last 7d", &checks.week),
            ("Last 30d", &checks.month),
            ("Last 365d", &checks.year),
        ];
        if windows.iter().any(|(_, window)| window.is_some()) {
            text.push_str("\nChecks:\n");
            for (label, window) in windows {
                if let Some(window) = window {
                    text.push_str(&format!(
                        "  {label}: {} total | {} up | {} down\n",
                        window.total.unwrap_or(0),
                        window.up.unwrap_or(0),
                        window.down.unwrap_or(0)
                    ));
                }
            }
        }
    }

    if let Some(ssl) = &summary.ssl_certificate {
        let days_remaining = ssl.days_remaining.or_else(|| {
            ssl.expiry().and_then(|expiry| {
                OffsetDateTime::parse(expiry, &Rfc3339)
                    .ok()
                    .map(|expires| (expires - now).whole_days())
            })
        });
        text.push_str("\nSSL Certificate:\n");
        text.push_str(&format!(
            "  Status: {} | Issuer: {}",
            ssl.status.as_deref().unwrap_or("unknown"),
            ssl.issuer.as_deref().unwrap_or("N/A")
        ));
        if let Some(expiry) = ssl.expiry() {
            text.push_str(&format!(" | Expires: {expiry}"));
        }
        if let Some(days) = days_remaining {
            text.push_str(&format!(" | Days remaining: {days}"));
        }
    }

    text
}

// ============================================================================
// SECTION: Tests
// ============================================================================
