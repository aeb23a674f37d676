// crates/pulsegate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Argument parsing and config override tests.
// Purpose: Pin the command surface and override precedence.
// ============================================================================

//! Unit tests for command parsing and configuration overrides.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use clap::Parser;
use pulsegate_config::ServerTransport;

use crate::Cli;
use crate::Command;
use crate::TransportArg;
use crate::resolve_config;

#[test]
fn serve_parses_overrides() {
    let cli = Cli::try_parse_from([
        "pulsegate",
        "serve",
        "--transport",
        "http",
        "--bind",
        "127.0.0.1:3100",
    ])
    .unwrap();
    match cli.command {
        Command::Serve {
            config,
            transport,
            bind,
        } => {
            assert!(config.is_none());
            assert_eq!(transport, Some(TransportArg::Http));
            assert_eq!(bind.as_deref(), Some("127.0.0.1:3100"));
        }
        Command::Tools => panic!("expected serve"),
    }
}

#[test]
fn tools_subcommand_parses() {
    let cli = Cli::try_parse_from(["pulsegate", "tools"]).unwrap();
    assert!(matches!(cli.command, Command::Tools));
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["pulsegate", "explode"]).is_err());
}

#[test]
fn cli_overrides_apply_after_load() {
    let config =
        resolve_config(None, Some(TransportArg::Http), Some("127.0.0.1:3100".to_string()))
            .unwrap();
    assert_eq!(config.server.transport, ServerTransport::Http);
    assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:3100"));
}
