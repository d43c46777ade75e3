//! streamlens - streaming analytics dashboard for musicians

mod app;
mod report;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use streamlens_common::{init_logging, LoggingConfig, Period};
use streamlens_config::{Config, ConfigLoader, SourceKind};
use tracing::info;

use crate::app::DashboardApp;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Reporting period: day, week, month, or year
    #[arg(short, long)]
    period: Option<String>,

    /// Seed override for the sample data source
    #[arg(short, long)]
    seed: Option<u64>,
}

fn parse_period(raw: &str) -> Result<Period> {
    match raw.to_ascii_lowercase().as_str() {
        "day" => Ok(Period::Day),
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "year" => Ok(Period::Year),
        other => anyhow::bail!("unknown period '{}', expected day, week, month, or year", other),
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(seed) = args.seed {
        config.source.seed = seed;
        config.source.kind = SourceKind::Sample;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(LoggingConfig {
        level: config.logging.level.clone(),
        compact: config.logging.compact,
        file_path: config.logging.file.clone(),
        include_spans: config.logging.include_spans,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let period = match &args.period {
        Some(raw) => parse_period(raw)?,
        None => config.analytics.default_period,
    };
    let window = period.to_window(Local::now().date_naive())?;

    info!(window = %window, "starting dashboard run");

    let app = DashboardApp::new(&config)?;
    let data = app.run(window).await;
    print!("{}", report::render(&data));
    Ok(())
}
