//! CLI command definitions and dispatch for the `botgate` binary.
//!
//! Uses clap derive macros for argument parsing. Besides running the API
//! server, the CLI is the only way to issue API keys and manage capability
//! grants.

pub mod access;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use botgate_types::identity::Capability;

/// Bot registry with owner-scoped access control.
#[derive(Parser)]
#[command(name = "botgate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server] port` in config.toml).
        #[arg(short, long, env = "BOTGATE_PORT")]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host` in config.toml).
        #[arg(long, env = "BOTGATE_HOST")]
        host: Option<String>,

        /// Export trace spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Manage API keys.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Grant a capability to a user.
    Grant {
        /// User id.
        user: i64,
        /// One of bots:read, bots:write, bots:admin.
        capability: Capability,
    },

    /// Revoke a capability from a user.
    Revoke {
        /// User id.
        user: i64,
        /// One of bots:read, bots:write, bots:admin.
        capability: Capability,
    },

    /// Show the capabilities a user holds.
    Grants {
        /// User id.
        user: i64,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Issue a new API key for a user. The key is printed once.
    Create {
        /// User id the key authenticates as.
        #[arg(long)]
        user: i64,

        /// Label stored with the key.
        #[arg(long, default_value = "default")]
        name: String,

        /// Capabilities to grant along with the key (repeatable).
        #[arg(long = "grant")]
        grants: Vec<Capability>,
    },
}
