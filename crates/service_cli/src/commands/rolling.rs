//! Rolling command implementation
//!
//! Computes annualised rolling volatility of a cumulative-return series.

use std::path::Path;
use tabled::Tabled;
use tracing::info;

use crate::input::load_analytics;
use crate::output::{fraction_pct, print_csv, print_json, print_table, OutputFormat};
use crate::Result;
use folio_core::{rolling_risk, RollingWindow};

#[derive(Tabled)]
struct VolatilityRow<'a> {
    #[tabled(rename = "Date")]
    date: &'a str,
    #[tabled(rename = "Volatility")]
    volatility: String,
}

/// Run the rolling command
pub fn run(analytics: &Path, window: RollingWindow, format: OutputFormat) -> Result<()> {
    let series = load_analytics(analytics)?;
    let points = rolling_risk(&series, &window);
    info!(
        observations = series.len(),
        window = window.window(),
        points = points.len(),
        "computed rolling volatility"
    );

    match format {
        OutputFormat::Json => print_json(&points)?,
        OutputFormat::Csv => print_csv(&points)?,
        OutputFormat::Table => {
            let rows: Vec<VolatilityRow<'_>> = points
                .iter()
                .map(|point| VolatilityRow {
                    date: &point.date,
                    volatility: fraction_pct(point.volatility),
                })
                .collect();
            print_table(&rows);
        }
    }
    Ok(())
}
