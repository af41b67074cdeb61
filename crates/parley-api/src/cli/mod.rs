//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a
//! noun-verb pattern (e.g., `parley user create`, `parley model list`).

pub mod message;
pub mod model;
pub mod prompt;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat history and auth backend.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
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
        /// Listen address (overrides `[server].host`).
        #[arg(long, env = "PARLEY_HOST")]
        host: Option<String>,

        /// Listen port (overrides `[server].port`).
        #[arg(short, long, env = "PARLEY_PORT")]
        port: Option<u16>,

        /// Export spans to stdout through OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Manage users (create, list).
    User {
        #[command(subcommand)]
        action: user::UserCommand,
    },

    /// Manage upstream chat models (list, add, set-default, rotate-key, delete).
    Model {
        #[command(subcommand)]
        action: model::ModelCommand,
    },

    /// Manage chat sessions (create, history).
    Session {
        #[command(subcommand)]
        action: session::SessionCommand,
    },

    /// Manage messages within a session (add, last, pin, delete, clear).
    Message {
        #[command(subcommand)]
        action: message::MessageCommand,
    },

    /// Manage session prompts (add, list, edit, delete).
    Prompt {
        #[command(subcommand)]
        action: prompt::PromptCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
