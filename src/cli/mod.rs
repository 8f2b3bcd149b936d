//! # Command Line Interface
//!
//! The `travelbook` storefront on the terminal: browse and book packages,
//! manage the signed-in account, and run the admin console against a
//! TravelBook API.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod config;
pub mod config_cmd;
pub mod output;
pub mod packages;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Instrument;

use crate::api::{ClientConfig, TravelBookClient};
use crate::command_span;
use crate::errors::TravelBookError;
use crate::observability::{init_logging, log_client_config, LogFormat};
use crate::session::{MemoryTokenStore, Session, TokenStore};
use config::{CliConfig, ConfigTokenStore, TokenSource};

#[derive(Parser)]
#[command(name = "travelbook")]
#[command(about = "TravelBook storefront and admin console")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token for this invocation only
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to file containing a bearer token
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Base URL of the TravelBook API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, register and manage your account
    Auth {
        #[command(subcommand)]
        command: auth::AuthCommands,
    },

    /// Browse and search travel packages
    Packages {
        #[command(subcommand)]
        command: packages::PackageCommands,
    },

    /// Book trips and manage your bookings
    Bookings {
        #[command(subcommand)]
        command: bookings::BookingCommands,
    },

    /// Administrator console
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, LogFormat::from_env());

    let command = cli.command;
    match command {
        Commands::Config { command } => config_cmd::handle_config_command(command).await,
        Commands::Auth { command } => {
            let mut session =
                create_session(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            let span = command_span!("auth");
            auth::handle_auth_command(command, &mut session).instrument(span).await
        }
        Commands::Packages { command } => {
            let mut session =
                create_session(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            let span = command_span!("packages");
            packages::handle_package_command(command, &mut session).instrument(span).await
        }
        Commands::Bookings { command } => {
            let mut session =
                create_session(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            let span = command_span!("bookings");
            bookings::handle_booking_command(command, &mut session).instrument(span).await
        }
        Commands::Admin { command } => {
            let mut session =
                create_session(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            let span = command_span!("admin");
            admin::handle_admin_command(command, &mut session).instrument(span).await
        }
    }
}

/// Build a signed-out session with the resolved API location and token store
fn create_session(
    token: Option<String>,
    token_file: Option<PathBuf>,
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
) -> anyhow::Result<Session> {
    let file_config = CliConfig::load().unwrap_or_default();

    let tokens: Arc<dyn TokenStore> = match config::resolve_token(token, token_file, &file_config)? {
        TokenSource::Explicit(token) => Arc::new(MemoryTokenStore::with_token(token)),
        TokenSource::ConfigFile => Arc::new(ConfigTokenStore::default_location()?),
    };

    let config = ClientConfig {
        base_url: config::resolve_base_url(base_url, &file_config),
        timeout: config::resolve_timeout(timeout, &file_config),
        verbose,
    };
    log_client_config(&config);

    let client = TravelBookClient::new(config, tokens).context("Failed to create API client")?;
    Ok(Session::new(client))
}

/// Restore the stored identity, failing when nobody is signed in
pub(crate) async fn signed_in(session: &mut Session) -> anyhow::Result<()> {
    session.restore().await.map_err(report)?;
    session.require_user().map_err(report)?;
    Ok(())
}

/// Restore the stored identity and require an administrator
pub(crate) async fn signed_in_admin(session: &mut Session) -> anyhow::Result<()> {
    signed_in(session).await?;
    session.require_admin().map_err(report)?;
    Ok(())
}

/// Turn a library error into the message shown to the user. Field errors of
/// a rejected form are printed first.
pub(crate) fn report(error: TravelBookError) -> anyhow::Error {
    if let Some(result) = error.form_errors() {
        output::print_form_errors(result);
    }
    let message = error.user_message();
    if error.requires_login() {
        anyhow::anyhow!("{}\nRun 'travelbook auth login' to sign in", message)
    } else {
        anyhow::Error::new(error).context(message)
    }
}

/// Read one line from stdin after printing `label`
pub(crate) fn prompt(label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    eprint!("{}: ", label);
    std::io::stderr().flush().context("Failed to flush prompt")?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).context("Failed to read from stdin")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Value from a flag, or prompted for when the flag was omitted
pub(crate) fn flag_or_prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt(label),
    }
}

/// Ask a yes/no question, defaulting to no
pub(crate) fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} (y/N)", question))?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "travelbook",
            "packages",
            "list",
            "--base-url",
            "http://api.test",
            "--timeout",
            "3",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://api.test"));
        assert_eq!(cli.timeout, Some(3));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Packages { .. }));
    }

    #[test]
    fn test_report_keeps_user_message() {
        let error = report(TravelBookError::api("Package not found", 404));
        assert_eq!(error.to_string(), "Package not found");

        let error = report(TravelBookError::unauthorized(
            "Invalid credentials",
            crate::errors::AuthErrorType::InvalidToken,
        ));
        assert!(error.to_string().starts_with("Invalid credentials"));
    }
}
