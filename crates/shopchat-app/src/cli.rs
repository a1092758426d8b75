//! CLI argument definitions for the ShopChat binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ShopChat - ask a product catalog questions in plain language.
#[derive(Parser, Debug)]
#[command(name = "shopchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Catalog server port (serve only).
    #[arg(short = 'p', long = "port", global = true)]
    pub port: Option<u16>,

    /// Base URL of the catalog service (chat only).
    #[arg(short = 'u', long = "catalog-url", global = true)]
    pub catalog_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open and seed the catalog database, then serve the HTTP API.
    Serve,
    /// Store the username that chat sessions run as.
    Login {
        /// Username to log in as.
        username: String,
    },
    /// Start an interactive chat session against the catalog service.
    Chat,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SHOPCHAT_CONFIG env var > ~/.shopchat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SHOPCHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the catalog server port.
    ///
    /// Priority: --port flag > SHOPCHAT_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("SHOPCHAT_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        config_port
    }

    /// Resolve the catalog service base URL.
    ///
    /// Priority: --catalog-url flag > SHOPCHAT_CATALOG_URL env var > config file value.
    pub fn resolve_catalog_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.catalog_url {
            return url.clone();
        }
        match std::env::var("SHOPCHAT_CATALOG_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => config_url.to_string(),
        }
    }

    /// Resolve the log level: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".shopchat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".shopchat").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let args = CliArgs::parse_from(["shopchat", "serve", "--port", "8080"]);
        assert_eq!(args.command, Command::Serve);
        assert_eq!(args.port, Some(8080));

        let args = CliArgs::parse_from(["shopchat", "login", "ada"]);
        assert_eq!(
            args.command,
            Command::Login {
                username: "ada".to_string()
            }
        );

        let args = CliArgs::parse_from(["shopchat", "-u", "http://shop:9000", "chat"]);
        assert_eq!(args.command, Command::Chat);
        assert_eq!(args.catalog_url.as_deref(), Some("http://shop:9000"));
    }

    #[test]
    fn test_flags_take_priority() {
        let args = CliArgs::parse_from([
            "shopchat",
            "chat",
            "--config",
            "/tmp/shop.toml",
            "--port",
            "7000",
            "--catalog-url",
            "http://a:1",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/shop.toml"));
        assert_eq!(args.resolve_port(5000), 7000);
        assert_eq!(args.resolve_catalog_url("http://b:2"), "http://a:1");
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["shopchat", "serve"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    #[test]
    fn test_login_requires_username() {
        assert!(CliArgs::try_parse_from(["shopchat", "login"]).is_err());
    }
}
