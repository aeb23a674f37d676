// crates/pulsegate-mcp/src/signals.rs
// ============================================================================
// Module: Signal Aggregation
// Description: Concurrent multi-signal gathering for deploy-safety checks.
// Purpose: Fetch health, predictions, and incidents without short-circuiting.
// Dependencies: pulsegate-core, pulsegate-gateway, tokio
// ============================================================================

//! ## Overview
//! The aggregator issues three independent gateway calls concurrently and
//! waits for all of them to settle. Each branch soft-fails on its own: a
//! failed health lookup yields an unknown score, a failed list fetch yields
//! an empty list. No branch failure aborts the others, because a safety
//! check must degrade gracefully rather than block on a transient data
//! source fault. The classifier's verdict is therefore identical regardless
//! of which fetch settles first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pulsegate_core::AggregatedSignals;
use pulsegate_core::HealthReport;
use pulsegate_core::Incident;
use pulsegate_core::Prediction;
use pulsegate_core::ServiceId;
use pulsegate_core::active_incidents;
use pulsegate_core::active_predictions;
use pulsegate_gateway::CallOptions;
use pulsegate_gateway::Gateway;
use pulsegate_gateway::decode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Page size requested for the incident list.
const INCIDENT_PAGE_LIMIT: &str = "10";

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Gathers deploy-safety signals for an optional service target.
///
/// The three fetches run concurrently and settle independently; the result
/// is already filtered to active entries and scoped to the target service
/// when one was supplied.
pub async fn gather(
    gateway: &dyn Gateway,
    service_id: Option<&ServiceId>,
    auth_token: Option<&str>,
) -> AggregatedSignals {
    let options = CallOptions::authorized(auth_token);

    let health = async {
        match service_id {
            Some(service) => {
                match gateway.get(&format!("/services/{service}/health"), &[], &options).await {
                    Ok(payload) => {
                        decode::<HealthReport>(payload).ok().and_then(|report| report.health_score)
                    }
                    Err(_) => None,
                }
            }
            None => None,
        }
    };

    let predictions = async {
        match gateway.get("/predictive/alerts", &[], &options).await {
            Ok(payload) => decode::<Vec<Prediction>>(payload).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    };

    let incidents = async {
        let query = vec![("limit".to_string(), INCIDENT_PAGE_LIMIT.to_string())];
        match gateway.get("/incidents", &query, &options).await {
            Ok(payload) => decode::<Vec<Incident>>(payload).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    };

    let (health_score, predictions, incidents) = tokio::join!(health, predictions, incidents);

    AggregatedSignals {
        health_score,
        predictions: active_predictions(predictions, service_id),
        incidents: active_incidents(incidents, service_id),
    }
}
