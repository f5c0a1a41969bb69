// src/main.rs
//! TrashCoin bridge CLI entry point.
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trashcoin_bridge::cli::{Cli, Commands};
use trashcoin_bridge::{BridgeConfig, BridgeSession, Surface, TerminalSurface};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    info!("Starting TrashCoin bridge v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    let surface: Arc<dyn Surface> = Arc::new(TerminalSurface::new());

    // Notices are rendered by the session; the exit code is all that is
    // left to do here.
    let session = match BridgeSession::connect(&config, surface).await {
        Ok(session) => session,
        Err(_) => std::process::exit(1),
    };

    let outcome = match cli.command {
        Commands::Balance => {
            session.refresh_balance().await;
            Ok(())
        }
        Commands::Mint { to, quantity, category } => {
            session.verify_and_mint(&to, &quantity, &category).await
        }
        Commands::Redeem { quantity } => session.redeem_tokens(&quantity).await,
        Commands::Transfer { to, quantity } => session.transfer_tokens(&to, &quantity).await,
        Commands::AddVerifier { address } => session.add_verifier(&address).await,
        Commands::RemoveVerifier { address } => session.remove_verifier(&address).await,
        Commands::Info => session.token_info().await.map(|_| ()),
    };

    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,ethers_providers=warn"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Resolve the configuration: --config flag, then CONFIG_PATH, then
/// ./config.toml, falling back to defaults with environment overrides.
fn load_config(flag: Option<&Path>) -> Result<BridgeConfig> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("CONFIG_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    if path.exists() {
        Ok(BridgeConfig::load(&path)?)
    } else {
        tracing::warn!(
            path = %path.display(),
            "No config file found; using defaults with environment overrides"
        );
        Ok(BridgeConfig::from_env())
    }
}
