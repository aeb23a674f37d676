// crates/pulsegate-mcp/src/config.rs
// ============================================================================
// Module: MCP Configuration (Re-export)
// Description: Re-export canonical Pulsegate config types.
// Purpose: Preserve MCP public API while centralizing config logic.
// Dependencies: pulsegate-config
// ============================================================================

//! ## Overview
//! This module re-exports the canonical configuration model from
//! `pulsegate-config` to keep MCP callers stable while enforcing a single
//! source of truth.

/// Re-export canonical config types and helpers.
pub use pulsegate_config::*;
