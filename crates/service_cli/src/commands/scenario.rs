//! Scenario command implementation
//!
//! Runs one stress scenario through the factor-model evaluator and prints
//! the headline, per-asset impacts and the stressed projection.

use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

use crate::input::resolve_weights;
use crate::output::{money, pct, print_csv, print_json, print_table, KeyValue, OutputFormat};
use crate::Result;
use folio_risk::{FactorModelEvaluator, ScenarioEngine, ScenarioKind, ScenarioResult};

/// Inputs of one scenario run.
#[derive(Debug)]
pub struct ScenarioArgs<'a> {
    pub id: &'a str,
    pub weights: Option<&'a str>,
    pub holdings: Option<&'a Path>,
    pub cash: f64,
    pub value: f64,
    pub path_count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct LineRow {
    day: usize,
    baseline: f64,
    scenario: f64,
}

#[derive(Tabled)]
struct ImpactRow<'a> {
    #[tabled(rename = "Asset")]
    asset: &'a str,
    #[tabled(rename = "Impact")]
    impact: String,
}

fn summary_rows(result: &ScenarioResult) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Headline impact", pct(result.headline_impact_pct)),
        KeyValue::new("Expected loss", money(result.expected_loss_absolute)),
        KeyValue::new("Expected loss %", pct(result.expected_loss_pct)),
        KeyValue::new("Max drawdown", pct(result.max_drawdown_pct)),
        KeyValue::new("VaR 95", pct(result.var_95_pct)),
        KeyValue::new(
            "Recovery (months)",
            format!("{:.1}", result.recovery_time_months),
        ),
    ]
}

fn print_summary(result: &ScenarioResult) {
    let name = ScenarioKind::from_id(&result.scenario_id)
        .map_or("Unknown scenario", |kind| kind.name());
    println!("{} ({})", name, result.scenario_id);

    print_table(&summary_rows(result));

    let impacts: Vec<ImpactRow<'_>> = result
        .per_asset_impact_pct
        .iter()
        .map(|(ticker, impact)| ImpactRow {
            asset: ticker.as_str(),
            impact: pct(*impact),
        })
        .collect();
    print_table(&impacts);
}

/// Run the scenario command
pub async fn run(args: ScenarioArgs<'_>, format: OutputFormat) -> Result<()> {
    let portfolio = resolve_weights(args.weights, args.holdings, args.cash)?;
    let evaluator = match args.path_count {
        Some(paths) => FactorModelEvaluator::new().with_path_count(paths),
        None => FactorModelEvaluator::new(),
    };
    info!(
        scenario_id = args.id,
        assets = portfolio.len(),
        portfolio_value = args.value,
        paths = evaluator.path_count(),
        "running scenario"
    );

    let engine = ScenarioEngine::new(evaluator);
    let result = engine.run_scenario(args.id, &portfolio, args.value).await;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Csv => print_csv(
            result
                .projection
                .median
                .iter()
                .zip(&result.scenario_line)
                .enumerate()
                .map(|(day, (&baseline, &scenario))| LineRow {
                    day,
                    baseline,
                    scenario,
                }),
        )?,
        OutputFormat::Table => print_summary(&result),
    }
    Ok(())
}
