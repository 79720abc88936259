//! nico-filter
//!
//! Opens the Niconico mobile site in Chrome and hides videos uploaded by the users in
//! your block-list mylist. Log in once in a persistent profile (`--user-data-dir`) so the
//! API requests carry your session.

use anyhow::Context;
use clap::Parser;
use nico_filter::{BrowserSession, ConnectionOptions, FilterConfig, FilterDriver, LaunchOptions, MatchMode};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "nico-filter")]
#[command(version)]
#[command(about = "Hide videos from block-listed users on sp.nicovideo.jp", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Page to open and filter
    #[arg(long, default_value = "https://sp.nicovideo.jp/")]
    url: String,

    /// JSON configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Name of the block-list mylist
    #[arg(long, value_name = "TITLE")]
    mylist_title: Option<String>,

    /// Newest videos hidden per blocked user
    #[arg(long, value_name = "N")]
    per_user_limit: Option<u32>,

    /// Milliseconds between suppression passes
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Milliseconds of polling before the filter stops
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// How links are matched against video IDs
    #[arg(long, value_enum)]
    match_mode: Option<MatchMode>,
}

impl Cli {
    fn filter_config(&self) -> anyhow::Result<FilterConfig> {
        let mut config = match &self.config {
            Some(path) => FilterConfig::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?,
            None => FilterConfig::default(),
        };

        if let Some(title) = &self.mylist_title {
            config = config.block_list_title(title.clone());
        }
        if let Some(limit) = self.per_user_limit {
            config = config.videos_per_user(limit);
        }
        if let Some(ms) = self.interval_ms {
            config = config.poll_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.timeout_ms {
            config = config.timeout(Duration::from_millis(ms));
        }
        if let Some(mode) = self.match_mode {
            config = config.match_mode(mode);
        }

        config.validate()?;
        Ok(config)
    }

    fn open_browser(&self) -> nico_filter::Result<BrowserSession> {
        match &self.ws_endpoint {
            Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint.clone())),
            None => {
                let mut options = LaunchOptions::new().headless(!self.headed);
                options.chrome_path = self.executable_path.clone();
                options.user_data_dir = self.user_data_dir.clone();
                BrowserSession::launch(options)
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.filter_config()?;

    log::info!("nico-filter v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Block-list '{}', {} videos per user, {:?} matching",
        config.block_list_title,
        config.videos_per_user,
        config.match_mode
    );

    let session = cli.open_browser().context("Failed to open browser")?;
    let tab = session.tab()?;
    session.navigate(&tab, &cli.url)?;
    log::info!("Filtering {}", cli.url);

    let driver = FilterDriver::for_tab(tab, config)?;
    let token = driver.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, stopping filter");
            token.cancel();
        }
    });

    let report = driver.run().await;
    println!(
        "Suppressed {} videos: {} passes, {} element matches{}",
        report.suppression_set_len,
        report.ticks,
        report.hidden_total,
        if report.timed_out { "" } else { " (interrupted)" }
    );

    session.close()?;
    Ok(())
}
