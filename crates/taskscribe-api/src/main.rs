//! taskscribe webhook server and CLI entry point.
//!
//! Binary name: `taskscribe`
//!
//! Parses CLI arguments, sets up tracing, loads configuration from the
//! environment, then starts the server or runs a one-off command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use taskscribe_infra::config::load_from_env;
use taskscribe_observe::tracing_setup::{
    TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "taskscribe", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    if let Err(e) = &result {
        let chain = format!("{e:#}");
        tracing::error!(error = %chain, "command failed");
    }

    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_from_env()?;

    match cli.command {
        Commands::Serve { port, host } => cli::serve::serve(config, host, port).await,
        Commands::Process { page_id } => cli::process::process(&config, &page_id, cli.json).await,
        Commands::Backfill { since, limit } => {
            cli::process::backfill(&config, since, limit, cli.json).await
        }
        Commands::Sign { file } => cli::sign::sign(&config, &file).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
