//! verstamp - build version stamping
//!
//! Turns a build timestamp into a version number with a 64-second grain and
//! reads such version numbers back to the time they were stamped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use verstamp_core::clock::SystemClock;
use verstamp_core::config::{DEFAULT_CONFIG_FILE, StampConfig};

mod commands;

/// verstamp - build version stamping
#[derive(Parser, Debug)]
#[command(name = "verstamp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file [default: verstamp.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides `[log] level`
    #[arg(long)]
    log_level: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a timestamp (default: now) into a version number
    Encode(commands::encode::EncodeArgs),

    /// Decode a version number back to the start of its 64-second grain
    Decode(commands::decode::DecodeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = load_config(cli.config.as_deref())?;

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match &config_path {
        Some(path) => debug!(path = %path.display(), "using configuration file"),
        None => debug!("no configuration file, using defaults"),
    }

    // Commands return precise exit codes: 0=success, 1=error, 2=range_error
    let exit_code = match &cli.command {
        Commands::Encode(args) => {
            commands::encode::run_encode(args, &config, cli.json, &SystemClock)
        },
        Commands::Decode(args) => commands::decode::run_decode(args, cli.json),
    };
    std::process::exit(i32::from(exit_code));
}

/// Loads the explicit config file, or the default one if it exists.
fn load_config(explicit: Option<&Path>) -> Result<(StampConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configuration file not found: {}", path.display());
            }
            path.to_path_buf()
        },
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok((StampConfig::default(), None));
            }
            default
        },
    };

    let config = StampConfig::from_file(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok((config, Some(path)))
}
