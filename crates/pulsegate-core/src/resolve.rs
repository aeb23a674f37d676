// crates/pulsegate-core/src/resolve.rs
// ============================================================================
// Module: Entity Resolution
// Description: Fuzzy name resolution for services and monitors.
// Purpose: Map a human-supplied name to exactly one backend entity.
// Dependencies: pulsegate-core::model
// ============================================================================

//! ## Overview
//! Resolution turns a free-text name into zero, one, or many entities with a
//! fixed disambiguation contract: an exact case-insensitive match always wins,
//! even when the same query is also a substring of other names; otherwise a
//! unique substring match resolves, and multiple substring matches are
//! reported back in their original order for the caller to disambiguate.
//!
//! ## Invariants
//! - `resolve` is a pure function of its inputs.
//! - A returned entity's name always case-insensitively equals or contains
//!   the query.
//! - Ambiguous candidates preserve the input collection order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::Monitor;
use crate::model::Service;

// ============================================================================
// SECTION: Resolution Contract
// ============================================================================

/// An entity that can be targeted by name resolution.
pub trait Named {
    /// Returns the entity's display name.
    fn name(&self) -> &str;
}

impl Named for Service {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Monitor {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of resolving a query against a collection of named entities.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    /// Exactly one entity matched.
    Resolved(&'a T),
    /// No entity's name equals or contains the query.
    NotFound,
    /// Multiple entities contain the query and none equals it exactly.
    /// Candidates appear in original collection order.
    Ambiguous(Vec<&'a T>),
}

/// Resolves a query against a collection of named entities.
///
/// Matching is case-insensitive. An exact name match wins immediately;
/// otherwise substring matches are collected, and only a unique substring
/// match resolves. An empty query is a substring of every name and therefore
/// matches all entities; callers that treat empty input as "absent" must
/// guard before calling.
#[must_use]
pub fn resolve<'a, T: Named>(entities: &'a [T], query: &str) -> Resolution<'a, T> {
    let needle = query.to_lowercase();
    if let Some(exact) = entities.iter().find(|entity| entity.name().to_lowercase() == needle) {
        return Resolution::Resolved(exact);
    }
    let matches: Vec<&T> =
        entities.iter().filter(|entity| entity.name().to_lowercase().contains(&needle)).collect();
    match matches.as_slice() {
        [] => Resolution::NotFound,
        [single] => Resolution::Resolved(single),
        _ => Resolution::Ambiguous(matches),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
