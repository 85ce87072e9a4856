//! Project command implementation
//!
//! Runs the Monte Carlo forward value projection from daily drift and
//! volatility figures.

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::output::{money_cell, print_csv, print_json, print_table, OutputFormat};
use crate::Result;
use folio_core::ProjectionBand;
use folio_projection::mc::{validate_horizon, GbmParams, PortfolioValueProjector, ProjectionConfig};

/// One day of the band.
#[derive(Debug, Serialize, Tabled)]
struct BandRow {
    #[tabled(rename = "Day")]
    day: usize,
    #[tabled(rename = "P10", display_with = "money_cell")]
    p10: f64,
    #[tabled(rename = "Median", display_with = "money_cell")]
    median: f64,
    #[tabled(rename = "P90", display_with = "money_cell")]
    p90: f64,
}

fn band_rows(band: &ProjectionBand) -> impl Iterator<Item = BandRow> + '_ {
    (0..band.len()).map(move |day| BandRow {
        day,
        p10: band.p10[day],
        median: band.median[day],
        p90: band.p90[day],
    })
}

/// Prints a projection band in `format`.
pub fn print_band(band: &ProjectionBand, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(band)?,
        OutputFormat::Csv => print_csv(band_rows(band))?,
        OutputFormat::Table => print_table(&band_rows(band).collect::<Vec<_>>()),
    }
    Ok(())
}

/// Run the project command
pub fn run(
    seed_value: f64,
    drift: f64,
    volatility: f64,
    horizon_days: usize,
    config: ProjectionConfig,
    format: OutputFormat,
) -> Result<()> {
    let horizon_days = validate_horizon(horizon_days)?;
    info!(
        seed_value,
        drift,
        volatility,
        horizon_days,
        paths = config.path_count(),
        seed = config.seed(),
        "starting projection"
    );

    let projector = PortfolioValueProjector::new(config);
    let band = projector.project(GbmParams::daily(seed_value, drift, volatility), horizon_days);

    print_band(&band, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_table;

    #[test]
    fn test_band_table_formats_money_cells() {
        let band = ProjectionBand::flat(1_000.0, 2);
        let rows: Vec<BandRow> = band_rows(&band).collect();
        let rendered = render_table(&rows);

        assert_eq!(rows.len(), 3);
        assert!(rendered.contains("Median"));
        assert!(rendered.contains("1000.00"));
        assert_eq!(rendered.lines().count(), 3 + 4);
    }
}
