// crates/pulsegate-gateway/src/lib.rs
// ============================================================================
// Module: Pulsegate Gateway
// Description: Authenticated HTTP client for the monitoring backend.
// Purpose: Provide timeout-bounded backend access with a typed failure model.
// Dependencies: reqwest, async-trait, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The gateway crate wraps the monitoring backend's REST API behind the
//! [`Gateway`] trait. Every call carries its own timeout and authentication,
//! responses are unwrapped from the backend's `data` envelope, and failures
//! collapse into the closed [`GatewayError`] taxonomy so callers never have
//! to inspect transport internals.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::CallOptions;
pub use client::Gateway;
pub use client::GatewayClient;
pub use client::GatewayConfig;
pub use client::GatewayError;
pub use client::decode;
