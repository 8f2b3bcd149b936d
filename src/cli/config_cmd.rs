//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.travelbook/config.toml

use anyhow::{Context, Result};
use clap::Subcommand;
use owo_colors::OwoColorize;

use super::config::CliConfig;
use super::output::{self, OutputFormat};
use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (base_url or timeout)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Remove a configuration value
    Unset {
        /// Configuration key (token, base_url or timeout)
        key: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands
pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => init_config(force)?,
        ConfigCommands::Show { output } => show_config(output)?,
        ConfigCommands::Set { key, value } => {
            let mut config = CliConfig::load()?;
            let message = set_value(&mut config, &key, &value)?;
            config.save()?;
            println!("{}", message.green());
            println!("Configuration saved to: {}", CliConfig::config_path()?.display());
        }
        ConfigCommands::Unset { key } => {
            let mut config = CliConfig::load()?;
            unset_value(&mut config, &key)?;
            config.save()?;
            println!("{}", format!("Removed '{}'", key).green());
        }
        ConfigCommands::Path => println!("{}", CliConfig::config_path()?.display()),
    }

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = CliConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let config = CliConfig {
        token: None,
        base_url: Some(DEFAULT_BASE_URL.to_string()),
        timeout: Some(DEFAULT_TIMEOUT_SECS),
    };
    config.save()?;

    println!("{} {}", "Configuration file created at:".green(), path.display());
    println!("\nYou can now set values using:");
    println!("  travelbook config set base_url <api-url>");
    println!("  travelbook config set timeout <seconds>");
    println!("and sign in with:");
    println!("  travelbook auth login --email <email>");

    Ok(())
}

fn show_config(format: OutputFormat) -> Result<()> {
    let path = CliConfig::config_path()?;

    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'travelbook config init' to create one");
        return Ok(());
    }

    let config = CliConfig::load()?;
    let shown = CliConfig { token: config.token.as_deref().map(mask_token), ..config };

    match format {
        OutputFormat::Table => print_config_table(&shown),
        format => output::print_output(&shown, format)?,
    }

    Ok(())
}

/// Apply `key = value`, returning the confirmation line
fn set_value(config: &mut CliConfig, key: &str, value: &str) -> Result<String> {
    match key {
        "base_url" => {
            url::Url::parse(value).with_context(|| format!("Invalid base URL: {}", value))?;
            config.base_url = Some(value.trim_end_matches('/').to_string());
            Ok(format!("Base URL set to: {}", value))
        }
        "timeout" => {
            let timeout: u64 =
                value.parse().context("Invalid timeout value. Must be a number in seconds")?;
            config.timeout = Some(timeout);
            Ok(format!("Timeout set to: {} seconds", timeout))
        }
        "token" => {
            anyhow::bail!("The token is written by 'travelbook auth login'; use --token for a one-off token")
        }
        _ => anyhow::bail!("Unknown configuration key: '{}'. Valid keys: base_url, timeout", key),
    }
}

fn unset_value(config: &mut CliConfig, key: &str) -> Result<()> {
    match key {
        "token" => config.token = None,
        "base_url" => config.base_url = None,
        "timeout" => config.timeout = None,
        _ => anyhow::bail!(
            "Unknown configuration key: '{}'. Valid keys: token, base_url, timeout",
            key
        ),
    }
    Ok(())
}

/// Keep the first and last four characters of a token
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn print_config_table(config: &CliConfig) {
    println!();
    println!("{:<15} {:<50}", "Key", "Value");
    output::print_separator(65);

    println!("{:<15} {}", "token", config.token.as_deref().unwrap_or("<not set>"));
    println!("{:<15} {}", "base_url", config.base_url.as_deref().unwrap_or("<not set>"));
    println!(
        "{:<15} {}",
        "timeout",
        config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(|| "<not set>".to_string())
    );

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value() {
        let mut config = CliConfig::default();
        set_value(&mut config, "base_url", "https://api.travelbook.test/api/").unwrap();
        set_value(&mut config, "timeout", "25").unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://api.travelbook.test/api"));
        assert_eq!(config.timeout, Some(25));

        assert!(set_value(&mut config, "timeout", "soon").is_err());
        assert!(set_value(&mut config, "base_url", "not a url").is_err());
        assert!(set_value(&mut config, "token", "abc").is_err());
        assert!(set_value(&mut config, "colour", "blue").is_err());
    }

    #[test]
    fn test_unset_value() {
        let mut config = CliConfig {
            token: Some("t".into()),
            base_url: Some("http://x".into()),
            timeout: Some(1),
        };
        unset_value(&mut config, "token").unwrap();
        assert!(config.token.is_none());
        assert!(unset_value(&mut config, "nope").is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"), "eyJh....sig");
    }
}
