//! Folio CLI - Command Line Operations for Portfolio Risk
//!
//! This is the operational entry point for the folio-risk engine.
//!
//! # Commands
//!
//! - `folio normalize --weights AAPL=60,GOOG=40` - Normalise weights and cash
//! - `folio rolling --analytics <file>` - Rolling volatility of a return series
//! - `folio project --seed-value V --drift MU --volatility SIGMA` - Forward value band
//! - `folio scenarios` - List the stress scenario catalogue
//! - `folio scenario --id market-crash --weights ...` - Run one stress scenario
//! - `folio overview --weights ... --risk <payload>` - Consolidated portfolio view
//!
//! # Architecture
//!
//! As the **S**ervice layer of the workspace, this crate wires configuration
//! and logging around the folio_core, folio_projection and folio_risk layers.

use clap::{Parser, Subcommand};
use folio_core::VolatilityBasis;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod input;
mod output;

use config::{build_config, CliArgs};
use output::OutputFormat;

pub use error::{CliError, Result};

/// Folio portfolio risk CLI
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base seed for Monte Carlo runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Time basis of upstream volatility (annualised, daily)
    #[arg(long, global = true, value_parser = VolatilityBasis::from_str)]
    volatility_basis: Option<VolatilityBasis>,

    /// Output format (json, csv, table)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalise asset weights and cash to percentages
    Normalize {
        /// Inline weights, e.g. AAPL=60,GOOG=40
        #[arg(short, long)]
        weights: Option<String>,

        /// Holdings CSV with `ticker,weight` rows
        #[arg(long, value_name = "FILE")]
        holdings: Option<PathBuf>,

        /// Cash amount normalised together with the weights
        #[arg(long, default_value_t = 0.0)]
        cash: f64,
    },

    /// Rolling annualised volatility of a cumulative-return series
    Rolling {
        /// Analytics series JSON file
        #[arg(short, long, value_name = "FILE")]
        analytics: PathBuf,

        /// Window length in observations
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Monte Carlo forward value projection
    Project {
        /// Starting portfolio value
        #[arg(long)]
        seed_value: f64,

        /// Expected daily return
        #[arg(long, allow_hyphen_values = true)]
        drift: f64,

        /// Daily volatility
        #[arg(long)]
        volatility: f64,

        /// Horizon in days
        #[arg(long)]
        horizon: Option<usize>,

        /// Number of Monte Carlo paths
        #[arg(short, long)]
        paths: Option<usize>,
    },

    /// List the stress scenario catalogue
    Scenarios,

    /// Run one stress scenario
    Scenario {
        /// Scenario identifier, e.g. market-crash
        #[arg(long)]
        id: String,

        /// Inline weights, e.g. AAPL=60,GOOG=40
        #[arg(short, long)]
        weights: Option<String>,

        /// Holdings CSV with `ticker,weight` rows
        #[arg(long, value_name = "FILE")]
        holdings: Option<PathBuf>,

        /// Cash amount normalised together with the weights
        #[arg(long, default_value_t = 0.0)]
        cash: f64,

        /// Portfolio value (defaults to the configured initial capital)
        #[arg(long)]
        value: Option<f64>,

        /// Number of Monte Carlo paths
        #[arg(short, long)]
        paths: Option<usize>,
    },

    /// Consolidated portfolio view from a risk payload
    Overview {
        /// Inline weights, e.g. AAPL=60,GOOG=40
        #[arg(short, long)]
        weights: String,

        /// Risk service response JSON file
        #[arg(short, long, value_name = "FILE")]
        risk: PathBuf,

        /// Initial capital (defaults to the configured value)
        #[arg(long)]
        capital: Option<f64>,

        /// Cash balance
        #[arg(long, default_value_t = 0.0)]
        cash: f64,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliArgs {
        config_file: cli.config.clone(),
        log_level: cli.log_level.clone(),
        path_count: None,
        seed: cli.seed,
        volatility_basis: cli.volatility_basis,
    })?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    init_tracing(log_level);
    info!(
        log_level = %config.log_level,
        seed = config.seed,
        paths = config.path_count,
        volatility_basis = config.volatility_basis.name(),
        "configuration loaded"
    );

    let format = OutputFormat::from_str(&cli.format)?;

    match cli.command {
        Commands::Normalize {
            weights,
            holdings,
            cash,
        } => commands::normalize::run(weights.as_deref(), holdings.as_deref(), cash, format),
        Commands::Rolling { analytics, window } => {
            let config = config::FolioConfig {
                rolling_window: window.unwrap_or(config.rolling_window),
                ..config
            };
            commands::rolling::run(&analytics, config.rolling()?, format)
        }
        Commands::Project {
            seed_value,
            drift,
            volatility,
            horizon,
            paths,
        } => {
            let config = config::FolioConfig {
                path_count: paths.unwrap_or(config.path_count),
                ..config
            };
            commands::project::run(
                seed_value,
                drift,
                volatility,
                horizon.unwrap_or(config.horizon_days),
                config.projection_config()?,
                format,
            )
        }
        Commands::Scenarios => commands::scenarios::run(format),
        Commands::Scenario {
            id,
            weights,
            holdings,
            cash,
            value,
            paths,
        } => {
            let args = commands::scenario::ScenarioArgs {
                id: &id,
                weights: weights.as_deref(),
                holdings: holdings.as_deref(),
                cash,
                value: value.unwrap_or(config.initial_capital),
                path_count: paths,
            };
            commands::scenario::run(args, format).await
        }
        Commands::Overview {
            weights,
            risk,
            capital,
            cash,
        } => {
            commands::overview::run(
                &weights,
                cash,
                capital.unwrap_or(config.initial_capital),
                &risk,
                config.refresh_settings()?,
                format,
            )
            .await
        }
    }
}
