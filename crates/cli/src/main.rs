//! stirrup: bootstrap a management server installation

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stirrup_client::ManagementClient;
use stirrup_reconciler::Bootstrap;
use tracing::info;

mod config;
mod statefile;

use config::Settings;

/// Bootstrap and credential rotation for management servers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Bootstrap state file path
    #[arg(short = 's', long = "state", default_value = "stirrup-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// First-time bootstrap of a fresh installation
    Create,
    /// Refresh observed settings from the server
    Read,
    /// Converge credentials and settings to the desired values
    Update,
    /// Forget the local bootstrap identity
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stirrup=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    if settings.server.url.is_empty() {
        anyhow::bail!("server.url is not configured");
    }

    let mut store = statefile::load(&cli.state)?;
    statefile::apply_desired(&mut store, &settings.bootstrap);

    let mut builder = ManagementClient::builder()
        .base_url(&settings.server.url)
        .bootstrap_mode(settings.server.bootstrap)
        .timeout(Duration::from_secs(settings.server.timeout_secs));
    if let Some(path) = &settings.server.ca_cert_file {
        let pem = std::fs::read_to_string(path)
            .with_context(|| format!("reading CA bundle {}", path.display()))?;
        builder = builder.ca_cert_pem(pem);
    }
    if settings.server.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    let client = builder.build().context("building management client")?;

    info!(url = %settings.server.url, "reconciling bootstrap state");
    let bootstrap = Bootstrap::new(Arc::new(client));
    let outcome = match cli.command {
        Command::Create => bootstrap.create(&mut store).await,
        Command::Read => bootstrap.read(&mut store).await,
        Command::Update => bootstrap.update(&mut store).await,
        Command::Delete => bootstrap.delete(&mut store),
    };

    // Persist whatever progress was made, even when the operation
    // failed: a token minted remotely must not be forgotten locally.
    statefile::save(&cli.state, &store)?;

    outcome.context("bootstrap reconciliation failed")?;
    info!("bootstrap state reconciled");
    Ok(())
}
