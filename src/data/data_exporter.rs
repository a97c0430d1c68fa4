use crate::data::application::Application;
use crate::data::table_view::Column;
use anyhow::{anyhow, Result};
use chrono::Local;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes registry rows out as CSV
pub struct DataExporter;

impl DataExporter {
    /// Timestamped default file name for an export
    pub fn default_filename() -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("applications_{}.csv", timestamp)
    }

    /// Write header plus one line per row. Values are raw field values.
    pub fn write_csv<W: Write>(rows: &[Application], writer: W) -> Result<usize> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(Column::ALL.iter().map(|c| c.header()))?;
        for app in rows {
            wtr.write_record(Column::ALL.iter().map(|c| c.raw(app)))?;
        }
        wtr.flush()?;

        Ok(rows.len())
    }

    pub fn export_to_csv(rows: &[Application], path: &Path) -> Result<String> {
        if rows.is_empty() {
            return Err(anyhow!("No data to export"));
        }

        let file = std::fs::File::create(path)?;
        let count = Self::write_csv(rows, file)?;
        info!(target: "export", "Exported {} rows to {}", count, path.display());

        Ok(format!(
            "Exported {} applications to CSV file: {}",
            count,
            path.display()
        ))
    }
}
