//! Page Load Monitor Binary

use clap::{Parser, Subcommand};
use page_load_monitor::browser::ChromiumEngine;
use page_load_monitor::dashboard::{self, AppState};
use page_load_monitor::{
    Config, Monitor, MonitorError, ReportAggregator, Result, ResultStore, SiteRegistry,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "page-load-monitor", version, about = "Measure page load times with a headless browser")]
struct Cli {
    /// Dashboard port
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding results.csv and summary_report.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Site to monitor; may be repeated, added after MONITOR_SITES
    #[arg(long = "site")]
    sites: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard (default)
    Serve,
    /// Run one monitoring pass over the configured sites and print the results
    Run,
    /// Append a summary row over all recorded results and print it
    Report,
}

#[actix_web::main]
async fn main() -> Result<()> {
    initialize_tracing();

    info!("Starting Page Load Monitor v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.sites.extend(cli.sites);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Monitor configuration - Results: {}, Summary: {}, Sites: {}, Threshold: {}s",
        config.results_path().display(),
        config.summary_path().display(),
        config.sites.len(),
        config.load_time_threshold_secs
    );

    let store = Arc::new(ResultStore::new(config.results_path()));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, store).await,
        Command::Run => run_once(&config, store).await,
        Command::Report => report(&config, store),
    }
}

async fn build_monitor(config: &Config, store: Arc<ResultStore>) -> Result<(Monitor, SiteRegistry)> {
    let settings = config.monitor_settings().map_err(MonitorError::Config)?;
    let engine = Arc::new(ChromiumEngine::new(config.browser_settings()));

    let registry = SiteRegistry::new();
    for site in &config.sites {
        match registry.try_add(site).await {
            Ok(true) => {}
            Ok(false) => warn!("Ignoring duplicate site: {}", site),
            Err(e) => warn!("Ignoring site: {}", e),
        }
    }

    Ok((Monitor::new(engine, store, settings), registry))
}

async fn serve(config: &Config, store: Arc<ResultStore>) -> Result<()> {
    let (monitor, registry) = build_monitor(config, store.clone()).await?;
    let state = actix_web::web::Data::new(AppState::new(registry, monitor, store));

    dashboard::serve(state, &config.bind_address, config.port).await?;
    Ok(())
}

async fn run_once(config: &Config, store: Arc<ResultStore>) -> Result<()> {
    let (monitor, registry) = build_monitor(config, store).await?;
    let sites = registry.list().await;
    if sites.is_empty() {
        warn!("No sites configured; set MONITOR_SITES or pass --site");
    }

    let report = monitor.run(&sites).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn report(config: &Config, store: Arc<ResultStore>) -> Result<()> {
    let offset = config.monitor_settings().map_err(MonitorError::Config)?.timestamp_offset;
    let aggregator = ReportAggregator::new(store, config.summary_path(), offset);

    let summary = aggregator.generate()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
