//! Scenarios command implementation
//!
//! Lists the stress scenario catalogue.

use crate::output::{pct, print_csv, print_json, print_table, OutputFormat};
use crate::Result;
use folio_risk::scenarios::{catalogue, ScenarioDefinition};
use tabled::Tabled;

#[derive(Tabled)]
struct CatalogueRow {
    #[tabled(rename = "Id")]
    id: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Probability")]
    probability: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl From<&ScenarioDefinition> for CatalogueRow {
    fn from(definition: &ScenarioDefinition) -> Self {
        Self {
            id: definition.id,
            name: definition.name,
            impact: pct(definition.headline_impact_pct),
            probability: definition.probability.to_string(),
            description: definition.description,
        }
    }
}

/// Run the scenarios command
pub fn run(format: OutputFormat) -> Result<()> {
    let definitions = catalogue();
    match format {
        OutputFormat::Json => print_json(&definitions)?,
        OutputFormat::Csv => print_csv(&definitions)?,
        OutputFormat::Table => {
            let rows: Vec<CatalogueRow> = definitions.iter().map(CatalogueRow::from).collect();
            print_table(&rows);
        }
    }
    Ok(())
}
