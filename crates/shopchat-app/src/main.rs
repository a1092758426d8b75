//! ShopChat application binary - composition root.
//!
//! - `serve`: open the catalog database, seed it when empty, run the HTTP API.
//! - `login`: store the username chat sessions run as.
//! - `chat`: interactive session against a running catalog service.

mod cli;
mod repl;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use shopchat_api::{start_server, AppState};
use shopchat_chat::{CatalogService, ChatSession, HttpCatalogClient};
use shopchat_core::config::ShopchatConfig;
use shopchat_core::credentials::{current_user, login};
use shopchat_core::error::ShopchatError;
use shopchat_storage::{seed_if_empty, Database, ProductRepository, SqliteCredentialStore};

use cli::{CliArgs, Command};
use repl::StdinConfirm;

/// How the configuration was obtained; reported once tracing is up.
#[derive(Debug)]
enum ConfigSource {
    File,
    Missing,
    Invalid(ShopchatError),
}

/// Read the config file without logging, falling back to defaults.
fn read_config(path: &Path) -> (ShopchatConfig, ConfigSource) {
    if !path.exists() {
        return (ShopchatConfig::default(), ConfigSource::Missing);
    }
    match ShopchatConfig::load(path) {
        Ok(config) => (config, ConfigSource::File),
        Err(e) => (ShopchatConfig::default(), ConfigSource::Invalid(e)),
    }
}

/// Open the database at the configured location.
fn open_database(config: &ShopchatConfig) -> Result<Arc<Database>, ShopchatError> {
    let db_path = config.database_path();
    match Database::new(&db_path) {
        Ok(db) => Ok(Arc::new(db)),
        Err(e) => {
            tracing::error!(path = %db_path.display(), error = %e, "Failed to open database");
            Err(e)
        }
    }
}

fn credential_store(config: &ShopchatConfig) -> Result<SqliteCredentialStore, ShopchatError> {
    Ok(SqliteCredentialStore::new(open_database(config)?))
}

async fn serve(config: ShopchatConfig) -> Result<(), ShopchatError> {
    let db = open_database(&config)?;

    let seeded = seed_if_empty(&ProductRepository::new(Arc::clone(&db)), config.server.seed_count)?;
    if seeded > 0 {
        tracing::info!(count = seeded, "Seeded product catalog");
    }

    let state = AppState::new(config.clone(), db);
    start_server(&config, state).await
}

fn login_user(config: &ShopchatConfig, username: &str) -> Result<(), ShopchatError> {
    let store = credential_store(config)?;
    let user = login(&store, &config.session.credential_key, username)?;
    println!("Logged in as {}", user);
    Ok(())
}

async fn chat(config: &ShopchatConfig, catalog_url: &str) -> Result<(), ShopchatError> {
    let store = credential_store(config)?;
    let Some(user) = current_user(&store, &config.session.credential_key)?
    else {
        eprintln!("Not logged in. Run `shopchat login <username>` first.");
        return Err(ShopchatError::InvalidCredential(
            "no stored username".to_string(),
        ));
    };

    let client = HttpCatalogClient::new(catalog_url, Duration::from_secs(config.catalog.timeout_secs))
        .map_err(|e| ShopchatError::Catalog(e.to_string()))?;
    tracing::info!(url = %client.base_url(), user = %user, "Connecting to catalog service");
    let catalog: Arc<dyn CatalogService> = Arc::new(client);

    let session = ChatSession::new(user, catalog, Arc::new(StdinConfirm));
    if let Err(e) = session.hydrate().await {
        // Already logged; start from an empty transcript.
        tracing::debug!(error = %e, "Continuing without history");
    }

    repl::run(&session).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config_path = args.resolve_config_path();
    let (mut config, source) = read_config(&config_path);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting ShopChat v{}", env!("CARGO_PKG_VERSION"));
    match source {
        ConfigSource::File => {
            tracing::info!(path = %config_path.display(), "Configuration loaded")
        }
        ConfigSource::Missing => {
            tracing::info!(path = %config_path.display(), "No configuration file; using defaults")
        }
        ConfigSource::Invalid(e) => tracing::warn!(
            path = %config_path.display(),
            error = %e,
            "Failed to load configuration; using defaults"
        ),
    }

    match args.command {
        Command::Serve => {
            config.server.port = args.resolve_port(config.server.port);
            serve(config).await?;
        }
        Command::Login { ref username } => login_user(&config, username)?,
        Command::Chat => {
            let url = args.resolve_catalog_url(&config.catalog.base_url);
            chat(&config, &url).await?;
        }
    }

    Ok(())
}
