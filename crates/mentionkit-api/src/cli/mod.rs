//! CLI command definitions and dispatch for the `mkit` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod action;
pub mod compose;
pub mod entity;
pub mod thread;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use mentionkit_types::thread::ANONYMOUS_USER;

use thread::ThreadCommand;

/// Inject entity context into chat messages and dispatch UI actions.
#[derive(Parser)]
#[command(name = "mkit", version, about, long_about = None)]
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

    /// Entity seed file (overrides `seed_file` in config.toml).
    #[arg(long, global = true, env = "MENTIONKIT_SEED")]
    pub seed: Option<PathBuf>,

    /// User id that owns threads and attachments.
    #[arg(long, global = true, env = "MENTIONKIT_USER", default_value = ANONYMOUS_USER)]
    pub user: String,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose a message: resolve its mentions and attachments into context.
    Compose {
        /// Message text, e.g. "Where is @order_123?".
        text: String,

        /// Attachment id to include (repeatable).
        #[arg(long = "attach", value_name = "ID")]
        attachments: Vec<String>,

        /// Append the message to this thread instead of only printing it.
        #[arg(long)]
        thread: Option<String>,
    },

    /// Store a local file in the upload directory and print its attachment id.
    Upload {
        /// Path of the file to upload.
        path: PathBuf,
    },

    /// Dispatch a UI action through the action bridge.
    Action {
        /// Action name, e.g. `apply_theme`.
        name: String,

        /// JSON payload (defaults to `{}`).
        #[arg(long)]
        payload: Option<String>,

        /// Record the action's reply in this thread.
        #[arg(long)]
        thread: Option<String>,
    },

    /// List registered entities.
    Entities,

    /// Show a single entity and its context block.
    Entity {
        /// Entity id.
        id: String,
    },

    /// Manage conversation threads.
    Thread {
        #[command(subcommand)]
        command: ThreadCommand,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compose_collects_attachments() {
        let cli = Cli::try_parse_from([
            "mkit", "compose", "see @order_123", "--attach", "file_1", "--attach", "file_2",
        ])
        .unwrap();
        match cli.command {
            Commands::Compose {
                text, attachments, thread,
            } => {
                assert_eq!(text, "see @order_123");
                assert_eq!(attachments, vec!["file_1", "file_2"]);
                assert!(thread.is_none());
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mkit", "entities", "--json", "-vv", "--user", "alice"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.user, "alice");
    }
}
