// Main entrypoint for refresherd: keeps the contents of a file fresh as a refreshable value.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use refresher::config::Config;
use refresher::refresher::telemetry;
use refresher::shutdown::GracefulShutdown;
use refresher::storage::JsonFileStorage;
use refresher::{Options, Refreshable, Refresher};

const CONFIG_PATH: &str = "cfg/refresher.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/refresher.cfg.local.yaml";

/// refresherd - keeps a short-lived value fresh in the background
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,

    /// File whose trimmed contents are the managed value
    #[arg(short, long, value_name = "FILE")]
    source_file: PathBuf,

    /// Lifetime assigned to every value read from the source file
    #[arg(short, long, value_name = "DURATION", default_value = "1h", value_parser = humantime::parse_duration)]
    ttl: Duration,
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<Config> {
    if let Some(custom_path) = path {
        return Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok(cfg),
        Err(_) => Config::load(CONFIG_PATH).with_context(|| format!("failed to load config from {}", CONFIG_PATH)),
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level()));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

/// Builds refresher options from config, wiring storage and logging hooks.
fn build_options(cfg: &Config) -> Options<String> {
    let mut opts = Options::<String>::from_schedule(&cfg.schedule)
        .on_refresh_success(|value: Arc<Refreshable<String>>| {
            info!(
                component = "main",
                event = "refreshed",
                expires_at = %value.expires_at,
                bytes = value.value.len(),
                "value refreshed"
            );
        })
        .on_refresh_failure(|err: Arc<anyhow::Error>| {
            warn!(component = "main", event = "refresh_failed", error = %format!("{err:#}"), "refresh failed");
        })
        .on_storage_write_failure(|err: Arc<anyhow::Error>| {
            warn!(component = "main", event = "persist_failed", error = %format!("{err:#}"), "persist failed");
        });

    if let Some(path) = cfg.storage_path() {
        info!(component = "main", event = "storage_configured", path = ?path, "persisting value to file");
        opts = opts.with_storage(JsonFileStorage::<String>::new(path));
    }
    opts
}

fn main() -> Result<()> {
    let args = Args::parse();

    tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let cfg = load_cfg(args.cfg)?;
    configure_logger(&cfg);

    let shutdown_token = CancellationToken::new();
    let graceful_shutdown = GracefulShutdown::new(shutdown_token.clone(), Duration::from_secs(10));

    let source_file = args.source_file.clone();
    let ttl = args.ttl;
    let refresh_fn = move |_ctx: CancellationToken| {
        let source_file = source_file.clone();
        async move {
            let data = tokio::fs::read_to_string(&source_file)
                .await
                .with_context(|| format!("read source file {:?}", source_file))?;
            Ok::<_, anyhow::Error>(Refreshable::issued_now(data.trim().to_string(), ttl))
        }
    };

    let refresher = Refresher::new(refresh_fn, build_options(&cfg));

    if let Err(e) = refresher.wait_for_initial_value(cfg.schedule.initial_timeout).await {
        error!(
            component = "main",
            event = "init_failed",
            error = %e,
            "failed to acquire initial value"
        );
        refresher.stop();
        return Err(e.into());
    }
    info!(
        component = "main",
        event = "ready",
        name = %refresher.name(),
        next_refresh_at = %refresher.next_refresh_at(),
        "initial value acquired"
    );

    graceful_shutdown.spawn(telemetry::logger(
        shutdown_token.clone(),
        refresher.clone(),
        cfg.schedule.stats_interval,
    ));

    let result = graceful_shutdown.await_shutdown().await;
    refresher.stop();

    if let Err(e) = result {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
