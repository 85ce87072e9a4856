//! Normalize command implementation
//!
//! Rescales raw weights and cash so they sum to 100 and prints the
//! resulting holdings rows.

use std::path::Path;
use tabled::Tabled;
use tracing::info;

use crate::input::resolve_weights;
use crate::output::{pct, print_csv, print_json, print_table, OutputFormat};
use crate::Result;

#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Run the normalize command
pub fn run(
    weights: Option<&str>,
    holdings: Option<&Path>,
    cash: f64,
    format: OutputFormat,
) -> Result<()> {
    let portfolio = resolve_weights(weights, holdings, cash)?;
    info!(
        assets = portfolio.len(),
        total_pct = portfolio.total_pct(),
        "normalised portfolio"
    );

    let records = portfolio.to_records();
    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Csv => print_csv(&records)?,
        OutputFormat::Table => {
            let rows: Vec<WeightRow> = records
                .iter()
                .map(|record| WeightRow {
                    ticker: record.ticker.to_string(),
                    weight: pct(record.weight),
                })
                .collect();
            print_table(&rows);
        }
    }
    Ok(())
}
