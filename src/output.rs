use crate::error::OutputError;
use crate::reports::{forecast_rows, Analysis};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const ANALYSIS_FILE: &str = "analysis.json";
pub const LEAD_TIME_FORECAST_FILE: &str = "leadtime_forecast.csv";
pub const BULLWHIP_FORECAST_FILE: &str = "bullwhip_forecast.csv";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Write the machine-readable analysis plus one CSV per forecast into `dir`.
/// Returns the paths written, in order.
pub fn export_analysis(dir: &Path, analysis: &Analysis) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;

    let json = dir.join(ANALYSIS_FILE);
    write_json(&json, analysis)?;
    let lead = dir.join(LEAD_TIME_FORECAST_FILE);
    write_csv(&lead, &forecast_rows(&analysis.lead_time_forecast, 2))?;
    let bullwhip = dir.join(BULLWHIP_FORECAST_FILE);
    write_csv(&bullwhip, &forecast_rows(&analysis.bullwhip_forecast, 2))?;

    info!(dir = %dir.display(), "analysis exported");
    Ok(vec![json, lead, bullwhip])
}

/// Render at most `max_rows` rows as a markdown table.
pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table_rows(rows, max_rows));
}
