//! CLI configuration management
//!
//! Settings come from defaults, then `folio.toml`, then `FOLIO_*`
//! environment variables, then command line flags.

use folio_core::{CoreError, RollingWindow, VolatilityBasis, TRADING_DAYS_PER_YEAR};
use folio_projection::mc::{validate_horizon, ProjectionConfig};
use folio_projection::ProjectionConfigError;
use folio_risk::session::DEFAULT_INITIAL_CAPITAL;
use folio_risk::RefreshSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid initial capital: {0}")]
    InvalidCapital(f64),

    #[error("Invalid daily drift: {0}")]
    InvalidDrift(f64),

    #[error(transparent)]
    Projection(#[from] ProjectionConfigError),

    #[error(transparent)]
    Rolling(#[from] CoreError),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Log level used when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Monte Carlo paths for value projections
    pub path_count: usize,
    /// Base seed for value projections
    pub seed: u64,
    /// Projection horizon in days
    pub horizon_days: usize,
    /// Time basis of upstream volatility figures
    pub volatility_basis: VolatilityBasis,
    /// Initial capital for new sessions
    pub initial_capital: f64,
    /// Rolling volatility window length
    pub rolling_window: usize,
    /// Expected daily return of the overview projection
    pub daily_drift: f64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        let projection = ProjectionConfig::default();
        let refresh = RefreshSettings::default();
        Self {
            log_level: LogLevel::Info,
            path_count: projection.path_count(),
            seed: projection.seed(),
            horizon_days: refresh.horizon_days,
            volatility_basis: refresh.volatility_basis,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            rolling_window: refresh.rolling_window.window(),
            daily_drift: refresh.daily_drift,
        }
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

impl FolioConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Applies `FOLIO_*` overrides found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FOLIO_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(paths) = lookup("FOLIO_PATH_COUNT") {
            self.path_count = parse_env("FOLIO_PATH_COUNT", &paths)?;
        }
        if let Some(seed) = lookup("FOLIO_SEED") {
            self.seed = parse_env("FOLIO_SEED", &seed)?;
        }
        if let Some(horizon) = lookup("FOLIO_HORIZON_DAYS") {
            self.horizon_days = parse_env("FOLIO_HORIZON_DAYS", &horizon)?;
        }
        if let Some(basis) = lookup("FOLIO_VOLATILITY_BASIS") {
            self.volatility_basis = VolatilityBasis::from_str(&basis).map_err(|_| {
                ConfigError::InvalidValue {
                    key: "FOLIO_VOLATILITY_BASIS",
                    value: basis.clone(),
                }
            })?;
        }
        if let Some(capital) = lookup("FOLIO_INITIAL_CAPITAL") {
            self.initial_capital = parse_env("FOLIO_INITIAL_CAPITAL", &capital)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(paths) = cli.path_count {
            self.path_count = paths;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(basis) = cli.volatility_basis {
            self.volatility_basis = basis;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection_config()?;
        self.rolling()?;
        validate_horizon(self.horizon_days)?;
        if !self.initial_capital.is_finite() || self.initial_capital < 0.0 {
            return Err(ConfigError::InvalidCapital(self.initial_capital));
        }
        if !self.daily_drift.is_finite() {
            return Err(ConfigError::InvalidDrift(self.daily_drift));
        }
        Ok(())
    }

    /// Projector configuration.
    pub fn projection_config(&self) -> Result<ProjectionConfig, ConfigError> {
        Ok(ProjectionConfig::builder()
            .path_count(self.path_count)
            .seed(self.seed)
            .build()?)
    }

    /// Rolling volatility window.
    pub fn rolling(&self) -> Result<RollingWindow, ConfigError> {
        Ok(RollingWindow::new(self.rolling_window, TRADING_DAYS_PER_YEAR)?)
    }

    /// Settings of the overview refresh.
    pub fn refresh_settings(&self) -> Result<RefreshSettings, ConfigError> {
        Ok(RefreshSettings {
            horizon_days: validate_horizon(self.horizon_days)?,
            daily_drift: self.daily_drift,
            volatility_basis: self.volatility_basis,
            rolling_window: self.rolling()?,
            projection: self.projection_config()?,
        })
    }
}

/// Global flags that override configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Path count override
    pub path_count: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Volatility basis override
    pub volatility_basis: Option<VolatilityBasis>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<FolioConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => FolioConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            FolioConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => FolioConfig::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
