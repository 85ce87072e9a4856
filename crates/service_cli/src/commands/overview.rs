//! Overview command implementation
//!
//! Builds the consolidated portfolio view from a risk payload on disk,
//! including the forward value projection.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;
use tracing::info;

use crate::input::{parse_weights, FileRiskSource};
use crate::output::{
    fraction_pct, money, or_na, pct, print_csv, print_json, print_table, KeyValue, OutputFormat,
};
use crate::{CliError, Result};
use folio_risk::{
    ConsolidatedView, PortfolioSession, RefreshCoordinator, RefreshOutcome, RefreshSettings,
};

#[derive(Debug, Serialize, Tabled)]
struct AssetRow<'a> {
    #[tabled(rename = "Asset")]
    ticker: &'a str,
    #[tabled(rename = "Weight", display_with = "pct_cell")]
    weight_pct: f64,
    #[tabled(rename = "VaR", display_with = "fraction_cell")]
    var: Option<f64>,
    #[tabled(skip)]
    volatility: Option<f64>,
    #[tabled(rename = "Risk", display_with = "risk_cell")]
    risk_level: Option<&'static str>,
    #[tabled(skip)]
    latest_return: Option<f64>,
}

fn pct_cell(value: &f64) -> String {
    pct(*value)
}

fn fraction_cell(value: &Option<f64>) -> String {
    or_na(*value, fraction_pct)
}

fn risk_cell(level: &Option<&'static str>) -> String {
    level.unwrap_or("Data not available").to_string()
}

fn asset_rows(view: &ConsolidatedView) -> impl Iterator<Item = AssetRow<'_>> {
    view.assets.iter().map(|asset| AssetRow {
        ticker: asset.ticker.as_str(),
        weight_pct: asset.weight_pct,
        var: asset.metrics.as_ref().map(|m| m.var),
        volatility: asset.metrics.as_ref().and_then(|m| m.volatility),
        risk_level: asset.risk_level.map(|level| level.label()),
        latest_return: asset.latest_return,
    })
}

fn print_view(view: &ConsolidatedView) {
    print_table(&[
        KeyValue::new("Current value", money(view.value.current_value)),
        KeyValue::new("Cash", pct(view.cash_pct)),
        KeyValue::new("Today", or_na(view.value.reported_change_pct, pct)),
    ]);

    if let Some(cards) = &view.portfolio {
        print_table(&[
            KeyValue::new("Risk level", cards.risk_level.to_string()),
            KeyValue::new("VaR", fraction_pct(cards.var)),
            KeyValue::new("Expected shortfall", fraction_pct(cards.es)),
            KeyValue::new(
                "Volatility (annual)",
                or_na(cards.annualised_volatility, fraction_pct),
            ),
            KeyValue::new(
                "Volatility (daily)",
                or_na(cards.daily_volatility, fraction_pct),
            ),
            KeyValue::new("Sharpe", format!("{:.2}", cards.sharpe)),
            KeyValue::new("Max drawdown", fraction_pct(cards.max_drawdown)),
            KeyValue::new("Beta", or_na(cards.beta, |b| format!("{:.2}", b))),
        ]);
    } else {
        println!("Portfolio risk data not available");
    }

    print_table(&asset_rows(view).collect::<Vec<_>>());

    if let Some(band) = view.projection.as_ref().filter(|band| !band.is_empty()) {
        let last = band.len() - 1;
        println!(
            "Day {} projection: p10 {} / median {} / p90 {}",
            last,
            money(band.p10[last]),
            money(band.median[last]),
            money(band.p90[last]),
        );
    }
}

/// Run the overview command
pub async fn run(
    weights: &str,
    cash: f64,
    capital: f64,
    risk: &Path,
    settings: RefreshSettings,
    format: OutputFormat,
) -> Result<()> {
    let mut session = PortfolioSession::new(capital)?;
    session.replace_weights(parse_weights(weights)?, cash)?;
    info!(
        assets = session.weights().len(),
        capital,
        cash,
        risk = %risk.display(),
        "building overview"
    );

    let coordinator = RefreshCoordinator::new(Arc::new(FileRiskSource::new(risk)), settings);
    let outcome = coordinator.refresh(session.snapshot()).await;
    let view = match (outcome, coordinator.latest_view()) {
        (RefreshOutcome::Applied(_), Some(view)) => view,
        (outcome, _) => return Err(CliError::RefreshFailed(format!("{:?}", outcome))),
    };

    match format {
        OutputFormat::Json => print_json(view.as_ref())?,
        OutputFormat::Csv => print_csv(asset_rows(&view))?,
        OutputFormat::Table => print_view(&view),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_table;

    #[test]
    fn test_asset_table_marks_missing_risk() {
        let rows = [
            AssetRow {
                ticker: "AAPL",
                weight_pct: 60.0,
                var: Some(0.032),
                volatility: None,
                risk_level: Some("Medium"),
                latest_return: None,
            },
            AssetRow {
                ticker: "GOOG",
                weight_pct: 40.0,
                var: None,
                volatility: None,
                risk_level: None,
                latest_return: None,
            },
        ];
        let rendered = render_table(&rows);

        assert!(rendered.contains("3.20%"));
        assert!(rendered.contains("n/a"));
        assert!(rendered.contains("Data not available"));
        assert!(!rendered.contains("latest_return"));
    }
}
