//! CSV export for simulation tick history.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::TickRecord;

/// Schema v1 column header for CSV history export.
const HEADER: &str = "timestep,time_hr,day,solar_wh,load_wh,battery_soc_pct,\
                      grid_flow_wh,cloud_cover,condition,inverter_operating";

/// Exports tick history to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `history` - Complete tick history
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(history: &[TickRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_history_csv(buf, history)
}

/// Writes tick history as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_history_csv(writer: impl Write, history: &[TickRecord]) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in history {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.2}", r.time_hr),
            r.day.to_string(),
            format!("{:.4}", r.solar_wh),
            format!("{:.4}", r.load_wh),
            format!("{:.4}", r.battery_soc_pct),
            format!("{:.4}", r.grid_flow_wh),
            format!("{:.4}", r.cloud_cover),
            r.condition.to_string(),
            r.inverter_operating.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
