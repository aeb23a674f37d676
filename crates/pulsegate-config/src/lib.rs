// crates/pulsegate-config/src/lib.rs
// ============================================================================
// Module: Pulsegate Configuration
// Description: Configuration loading and validation for Pulsegate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits, then
//! overridden by a small set of environment variables, then validated.
//! Missing or invalid configuration fails closed rather than starting a
//! misconfigured server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::GatewaySettings;
pub use config::PulsegateConfig;
pub use config::ServerConfig;
pub use config::ServerTransport;
