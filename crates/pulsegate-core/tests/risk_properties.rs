// crates/pulsegate-core/tests/risk_properties.rs
// ============================================================================
// Module: Risk Classifier Property-Based Tests
// Description: Property tests for verdict invariants.
// Purpose: Pin order-independence, safety coupling, and normalization.
// ============================================================================

//! Property-based tests for risk classifier invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use pulsegate_core::AggregatedSignals;
use pulsegate_core::Incident;
use pulsegate_core::Prediction;
use pulsegate_core::RiskLevel;
use pulsegate_core::classify;
use pulsegate_core::normalize_confidence;
use pulsegate_core::risk::GENERIC_TARGET_LABEL;
use serde_json::json;

fn incident_strategy() -> impl Strategy<Value = Incident> {
    (
        prop_oneof![
            Just("critical"),
            Just("high"),
            Just("medium"),
            Just("low"),
            Just("unheard-of"),
        ],
        prop_oneof![Just("detecting"), Just("investigating"), Just("monitoring")],
        "[a-zA-Z ]{0,24}",
    )
        .prop_map(|(severity, status, title)| {
            serde_json::from_value(json!({
                "id": "inc-p",
                "title": title,
                "severity": severity,
                "status": status,
            }))
            .unwrap()
        })
}

fn prediction_strategy() -> impl Strategy<Value = Prediction> {
    (0.0_f64 .. 100.0_f64, "[a-z-]{1,16}").prop_map(|(confidence, kind)| {
        serde_json::from_value(json!({
            "predictionType": kind,
            "confidence": confidence,
        }))
        .unwrap()
    })
}

fn signals_strategy() -> impl Strategy<Value = AggregatedSignals> {
    (
        prop::option::of(0.0_f64 ..= 100.0_f64),
        prop::collection::vec(prediction_strategy(), 0 .. 5),
        prop::collection::vec(incident_strategy(), 0 .. 5),
    )
        .prop_map(|(health_score, predictions, incidents)| AggregatedSignals {
            health_score,
            predictions,
            incidents,
        })
}

proptest! {
    #[test]
    fn safety_is_coupled_to_high_risk(signals in signals_strategy()) {
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        prop_assert_eq!(verdict.safe, verdict.risk_level != RiskLevel::High);
    }

    #[test]
    fn verdict_level_is_input_order_independent(
        signals in signals_strategy(),
        incident_rotation in 0_usize .. 5,
        prediction_rotation in 0_usize .. 5,
    ) {
        let baseline = classify(&signals, GENERIC_TARGET_LABEL);
        let mut rotated = signals;
        if !rotated.incidents.is_empty() {
            let pivot = incident_rotation % rotated.incidents.len();
            rotated.incidents.rotate_left(pivot);
        }
        if !rotated.predictions.is_empty() {
            let pivot = prediction_rotation % rotated.predictions.len();
            rotated.predictions.rotate_left(pivot);
        }
        let shuffled = classify(&rotated, GENERIC_TARGET_LABEL);
        prop_assert_eq!(baseline.risk_level, shuffled.risk_level);
        prop_assert_eq!(baseline.safe, shuffled.safe);
        prop_assert_eq!(baseline.recommendation, shuffled.recommendation);
        prop_assert_eq!(baseline.reason, shuffled.reason);
        prop_assert_eq!(baseline.active_issues.len(), shuffled.active_issues.len());
    }

    #[test]
    fn normalization_is_idempotent_above_one(raw in 0.0_f64 ..= 100.0_f64) {
        let normalized = normalize_confidence(raw);
        prop_assert!((0.0 ..= 100.0).contains(&normalized));
        if raw > 1.0 {
            prop_assert_eq!(normalized, raw);
        }
        if normalized > 1.0 {
            prop_assert_eq!(normalize_confidence(normalized), normalized);
        }
    }

    #[test]
    fn issue_count_never_exceeds_evidence_count(signals in signals_strategy()) {
        let budget = signals.incidents.len() + signals.predictions.len() + 1;
        let verdict = classify(&signals, GENERIC_TARGET_LABEL);
        prop_assert!(verdict.active_issues.len() <= budget);
    }
}
