use std::sync::Arc;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vigil::{
    config::load_config,
    poller::Poller,
    service::IntelService,
};

#[derive(Parser, Debug)]
#[command(name = "vigil", about = "Threat-intelligence feed aggregation")]
struct Cli {
    /// Path to config file (TOML). Default: config/vigil.toml
    #[arg(long)]
    config: Option<String>,
    /// Increase verbosity (info, debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Log file path
    #[arg(long, default_value = "data/vigil.log")]
    log_file: String,
    /// Dashboard section to fetch
    #[arg(long, default_value = "all", value_enum)]
    section: SectionArg,
    /// Also write the JSON result to this path
    #[arg(long)]
    output: Option<String>,
    /// Keep running and refresh on the configured intervals
    #[arg(long)]
    watch: bool,
    /// Seed the random source (pins the synthesized filler)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SectionArg {
    All,
    Threats,
    Apt,
    Predictions,
    Timeline,
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli)?;

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let mut service = IntelService::new(config).context("building feed client")?;
    if let Some(seed) = cli.seed {
        service = service.with_seed(seed);
    }

    if cli.watch {
        run_watch(service).await
    } else {
        run_once(service, cli.section, cli.output.as_deref()).await
    }
}

async fn run_once(service: IntelService, section: SectionArg, output: Option<&str>) -> Result<()> {
    let value = match section {
        SectionArg::All => {
            let threats = service.threats().await?;
            // The propagate-mode sections are caught here, per section, so
            // one outage never blanks the rest of the dump.
            let apt_groups = service.apt_groups().await.unwrap_or_else(|err| {
                tracing::warn!("APT section unavailable: {err}");
                Vec::new()
            });
            let predictions = service.predictions().await.unwrap_or_else(|err| {
                tracing::warn!("prediction section unavailable: {err}");
                Vec::new()
            });
            let timeline = service.timeline().await?;
            let status = service.status().await?;
            serde_json::json!({
                "threats": threats,
                "apt_groups": apt_groups,
                "predictions": predictions,
                "timeline": timeline,
                "status": status,
            })
        }
        SectionArg::Threats => serde_json::to_value(service.threats().await?)?,
        SectionArg::Apt => serde_json::to_value(
            service.apt_groups().await.context("fetching APT groups")?,
        )?,
        SectionArg::Predictions => serde_json::to_value(
            service.predictions().await.context("fetching predictions")?,
        )?,
        SectionArg::Timeline => serde_json::to_value(service.timeline().await?)?,
        SectionArg::Status => serde_json::to_value(service.status().await?)?,
    };

    let json = serde_json::to_string_pretty(&value)?;
    if let Some(path) = output {
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating output directory")?;
        }
        fs::write(path, &json).context("writing output file")?;
        tracing::info!("result written to {}", path.display());
    }
    println!("{json}");
    Ok(())
}

async fn run_watch(service: IntelService) -> Result<()> {
    let poller = Poller::spawn(Arc::new(service));
    let mut rx = poller.subscribe();
    tracing::info!("watching feeds; ctrl-c to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow().clone();
                tracing::info!(
                    threats = snapshot.threats.len(),
                    apt_groups = snapshot.apt_groups.len(),
                    predictions = snapshot.predictions.len(),
                    timeline = snapshot.timeline.len(),
                    status = snapshot.status.is_some(),
                    "snapshot updated"
                );
            }
        }
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("creating log directory")?;
    }
    if log_path.exists() {
        if let Ok(meta) = fs::metadata(log_path) {
            if meta.len() > 1_000_000 {
                let rotated = log_path.with_extension("log.1");
                let _ = fs::rename(log_path, rotated);
            }
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .context("opening log file")?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    // Logs go to stderr so section dumps on stdout stay machine-readable.
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))
}
