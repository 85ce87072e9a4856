//! Output formats and rendering helpers.

use crate::{CliError, Result};
use serde::Serialize;
use std::str::FromStr;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Supported output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

/// Renders `rows` as a rounded table with the first column left-aligned.
pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "No data.".to_string();
    }
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string()
}

/// Prints `rows` as a table to stdout.
pub fn print_table<T: Tabled>(rows: &[T]) {
    println!("{}", render_table(rows));
}

/// A labelled figure for two-column summaries.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` as CSV with a header derived from the row type.
pub fn print_csv<I, T>(rows: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Formats a currency amount with two decimals.
pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Formats a percentage with two decimals.
pub fn pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Formats a fraction as a percentage.
pub fn fraction_pct(value: f64) -> String {
    pct(value * 100.0)
}

/// Formats an optional figure, or `n/a`.
pub fn or_na(value: Option<f64>, format: fn(f64) -> String) -> String {
    value.map_or_else(|| "n/a".to_string(), format)
}

/// Table cell for a currency amount.
pub fn money_cell(value: &f64) -> String {
    money(*value)
}
