use clap::Parser;
use cpumon::config::{AppConfig, DEFAULT_CONFIG_FILE};
use env_logger::{Builder, WriteStyle};
use log::error;
use std::path::PathBuf;

/// Terminal monitor for per-core CPU frequency, memory, load, root disk and
/// hardware sensors.
#[derive(Debug, Parser)]
#[command(version, after_help = cpumon::input::HELP)]
struct Args {
    /// Print the report once and exit
    #[arg(short, long)]
    batch: bool,

    /// INI configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first (without logging)
    let config = AppConfig::from_file(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        // Fall back to default configuration
        AppConfig::default()
    });

    // Initialise logger with a configured log level
    Builder::new()
        .filter_level(config.get_log_level())
        .write_style(WriteStyle::Auto)
        .format_timestamp_secs()
        .init();

    if args.batch {
        return cpumon::run_batch(&config);
    }

    if let Err(e) = cpumon::run(config).await {
        error!("Application error: {}", e);
        return Err(e);
    }
    Ok(())
}
