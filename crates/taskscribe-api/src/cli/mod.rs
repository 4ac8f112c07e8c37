//! CLI command definitions and dispatch for the `taskscribe` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod process;
pub mod serve;
pub mod sign;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Turn voice transcripts in Notion into dated task pages.
#[derive(Parser)]
#[command(name = "taskscribe", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "TASKSCRIBE_LOG_JSON")]
    pub log_json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server.
    Serve {
        /// Port to listen on (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Summarize one record now and print the result.
    Process {
        /// Id of the record holding the transcript.
        page_id: String,
    },

    /// Summarize every record created in the tracked database since a time.
    Backfill {
        /// RFC 3339 timestamp, e.g. 2025-10-28T00:00:00Z.
        #[arg(long)]
        since: DateTime<Utc>,

        /// Maximum number of records to process.
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Print the X-Notion-Signature header value for a payload file.
    Sign {
        /// File containing the exact request body.
        file: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
