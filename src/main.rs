mod api;
mod app;
mod config;
mod favorites;
mod map;
mod models;
mod sequence;
mod share;
mod tui;
mod view;

#[cfg(test)]
mod test_support;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;

use crate::models::artist::artist_path;
use crate::share::{CommandShare, ShareTarget};

#[derive(Parser)]
#[command(name = "groupie-tracker-tui")]
#[command(about = "Browse bands, their concerts and tour map from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the artist API
    #[arg(long, env = "GROUPIE_API_URL")]
    api_url: Option<String>,

    /// Directory holding the favorites database and log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Program used to share a page, called as `<cmd> <title> <text> <url>`
    #[arg(long, env = "GROUPIE_SHARE_COMMAND")]
    share_command: Option<String>,

    /// Open this artist's page instead of the search page
    #[arg(short, long)]
    artist: Option<u32>,

    /// Where tracing output goes (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::AppConfig::default();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(path) = cli.log_file {
        config = config.with_log_path(path);
    }
    config = config.with_share_command(cli.share_command);
    config.ensure_filesystem()?;

    init_tracing(&config)?;
    tracing::info!(api = config.api_base_url(), "starting groupie tracker");

    let (msg_tx, msg_rx) = tokio::sync::mpsc::unbounded_channel();

    let client = api::groupie::GroupieClient::new(&config)?;
    let store = favorites::SledFavoritesStore::open(&config)?;
    let favorites = favorites::FavoritesService::load(Box::new(store))
        .context("Unable to read favorites")?;
    let share_target = config
        .share_command()
        .map(|cmd| Arc::new(CommandShare::new(cmd)) as Arc<dyn ShareTarget>);

    let listing = tui::ListingController::new(client.clone(), msg_tx.clone());
    let detail = tui::DetailController::new(client, share_target, msg_tx);

    let start_address = cli
        .artist
        .map(artist_path)
        .unwrap_or_else(|| "/".to_string());

    let app = tui::App::new(listing, detail, msg_rx, config, favorites, start_address);
    tui::run(app).await
}

fn init_tracing(config: &config::AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("Failed to open log file {}", config.log_path().display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("sled=warn,reqwest=warn,hyper=warn,info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
