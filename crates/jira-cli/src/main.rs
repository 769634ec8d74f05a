//! CLI entry point for the interactive Jira client.
//!
//! Run `jira-cli --help` for usage information.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use jira::config::{DEFAULT_TIMEOUT_SECS, ENV_JIRA_API_TOKEN, ENV_JIRA_EMAIL, ENV_JIRA_HOST};
use jira::{JiraClient, JiraConfig};
use jira_cli::{Shell, ToolRunner};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status after Ctrl-C during startup (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "jira-cli")]
#[command(about = "Jira CLI - call Jira operations from an interactive prompt")]
#[command(version)]
struct Cli {
    /// Interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Jira host, e.g. your-domain.atlassian.net
    #[arg(long, env = ENV_JIRA_HOST)]
    jira_host: Option<String>,

    /// Jira account email
    #[arg(long, env = ENV_JIRA_EMAIL)]
    jira_email: Option<String>,

    /// Jira API token
    #[arg(long, env = ENV_JIRA_API_TOKEN, hide_env_values = true)]
    jira_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "JIRA_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.interactive {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "Must specify --interactive mode")
            .exit();
    }

    init_tracing(cli.verbose);

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("\n❌ Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let connected = tokio::select! {
        connected = connect(client) => connected,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n\n👋 Interrupted");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    let outcome = match connected {
        Ok(client) => Shell::new(ToolRunner::new(client)).run().await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\n❌ Fatal error: {err:#}");
            if cli.verbose {
                eprintln!("{err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,jira=debug,jira_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_client(cli: &Cli) -> Result<JiraClient> {
    let config = JiraConfig::resolve(
        cli.jira_host.as_deref(),
        cli.jira_email.as_deref(),
        cli.jira_token.as_deref(),
    )?
    .with_timeout(Duration::from_secs(cli.timeout_secs));

    Ok(JiraClient::new(&config)?)
}

/// Verify the instance is reachable and the credentials are accepted.
async fn connect(client: JiraClient) -> Result<JiraClient> {
    let info = client
        .server_info()
        .await
        .with_context(|| format!("Failed to connect to Jira at {}", client.api_url()))?;

    info!(
        title = info.server_title.as_deref().unwrap_or_default(),
        version = info.version.as_deref().unwrap_or_default(),
        "Connected"
    );
    Ok(client)
}
