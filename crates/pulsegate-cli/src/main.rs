// crates/pulsegate-cli/src/main.rs
// ============================================================================
// Module: Pulsegate CLI Entry Point
// Description: Command dispatcher for the Pulsegate MCP server.
// Purpose: Provide a safe CLI for server execution and tool inspection.
// Dependencies: clap, pulsegate-config, pulsegate-mcp, tokio
// ============================================================================

//! ## Overview
//! The Pulsegate CLI starts the MCP server with a resolved configuration
//! (file, environment overrides, then command-line overrides) and offers an
//! offline dump of the tool catalog for client integration work.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use pulsegate_config::PulsegateConfig;
use pulsegate_config::ServerTransport;
use pulsegate_mcp::McpServer;
use pulsegate_mcp::tool_definitions;

// ============================================================================
// SECTION: Command Definitions
// ============================================================================

/// Pulsegate MCP server command line.
#[derive(Debug, Parser)]
#[command(name = "pulsegate", version, about = "MCP server for the Pulsegate monitoring backend")]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the MCP server.
    Serve {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Transport override.
        #[arg(long, value_enum)]
        transport: Option<TransportArg>,
        /// Bind address override for the HTTP transport.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the tool catalog as JSON.
    Tools,
}

/// Transport selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportArg {
    /// Framed JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over an HTTP endpoint.
    Http,
}

impl From<TransportArg> for ServerTransport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures surfaced to the operator.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Configuration loading failed.
    #[error("{0}")]
    Config(#[from] pulsegate_config::ConfigError),
    /// The server failed to start or serve.
    #[error("{0}")]
    Server(#[from] pulsegate_mcp::McpServerError),
    /// Writing CLI output failed.
    #[error("output failed: {0}")]
    Output(#[from] io::Error),
    /// Serializing CLI output failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "pulsegate: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected subcommand.
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve {
            config,
            transport,
            bind,
        } => {
            let config = resolve_config(config.as_deref(), transport, bind)?;
            let server = McpServer::from_config(config)?;
            server.serve().await?;
            Ok(())
        }
        Command::Tools => print_tool_catalog(),
    }
}

/// Resolves the effective configuration: file, env, then CLI overrides.
fn resolve_config(
    path: Option<&std::path::Path>,
    transport: Option<TransportArg>,
    bind: Option<String>,
) -> Result<PulsegateConfig, CliError> {
    let mut config = PulsegateConfig::load(path)?;
    if let Some(transport) = transport {
        config.server.transport = transport.into();
    }
    if let Some(bind) = bind {
        config.server.bind = Some(bind);
    }
    Ok(config)
}

/// Prints the tool catalog as pretty JSON on stdout.
fn print_tool_catalog() -> Result<(), CliError> {
    let catalog = serde_json::to_string_pretty(&tool_definitions())?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{catalog}")?;
    Ok(())
}
