//! Command inputs: weight lists, holdings files and upstream payloads.

use crate::{CliError, Result};
use async_trait::async_trait;
use folio_core::{AnalyticsSeries, HoldingRecord, PortfolioWeights};
use folio_risk::{RiskDataSource, RiskRequest, RiskResponse, UpstreamError};
use std::path::{Path, PathBuf};

/// Parses `AAPL=60,GOOG=40` into raw `(ticker, weight)` pairs.
pub fn parse_weights(list: &str) -> Result<Vec<(String, f64)>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (ticker, weight) = entry.split_once('=').ok_or_else(|| {
                CliError::InvalidArgument(format!("Expected TICKER=WEIGHT, got '{}'", entry))
            })?;
            let (ticker, weight) = (ticker.trim(), weight.trim());
            let weight: f64 = weight.parse().map_err(|_| {
                CliError::InvalidArgument(format!("Invalid weight '{}' for {}", weight, ticker))
            })?;
            Ok((ticker.to_string(), weight))
        })
        .collect()
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// Reads holdings rows (`ticker,weight`, optional `CASH` row) from CSV.
pub fn load_holdings(path: &Path) -> Result<PortfolioWeights> {
    ensure_exists(path)?;
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<HoldingRecord>, _>>()?;
    tracing::debug!(rows = records.len(), path = %path.display(), "loaded holdings");
    Ok(PortfolioWeights::from_records(&records)?)
}

/// Resolves the portfolio from either an inline weight list or a holdings file.
pub fn resolve_weights(
    weights: Option<&str>,
    holdings: Option<&Path>,
    cash: f64,
) -> Result<PortfolioWeights> {
    match (weights, holdings) {
        (Some(list), None) => Ok(PortfolioWeights::from_raw(parse_weights(list)?, cash)?),
        (None, Some(path)) => load_holdings(path),
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "Use either --weights or --holdings, not both".to_string(),
        )),
        (None, None) => Err(CliError::InvalidArgument(
            "One of --weights or --holdings is required".to_string(),
        )),
    }
}

/// Reads an analytics series from JSON.
pub fn load_analytics(path: &Path) -> Result<AnalyticsSeries> {
    ensure_exists(path)?;
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Risk data source that replays a JSON payload from disk.
///
/// The file is read on every fetch, so edits show up on the next refresh.
#[derive(Clone, Debug)]
pub struct FileRiskSource {
    path: PathBuf,
}

impl FileRiskSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RiskDataSource for FileRiskSource {
    async fn fetch_risk(
        &self,
        request: &RiskRequest,
    ) -> std::result::Result<RiskResponse, UpstreamError> {
        tracing::debug!(
            path = %self.path.display(),
            tickers = request.tickers.len(),
            portfolio_value = request.portfolio_value,
            "reading risk payload"
        );
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(RiskResponse::from_json(&text)?)
    }
}
