//! CSV export of the results table.

use std::fs;
use std::path::Path;

use crate::domain::error::SignalbenchError;
use crate::domain::report::{BacktestReport, COLUMNS};
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SignalbenchError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let csv_error = |e: csv::Error| SignalbenchError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        };

        let mut writer = csv::Writer::from_path(output_path).map_err(csv_error)?;
        writer.write_record(COLUMNS).map_err(csv_error)?;
        for row in &report.rows {
            writer.write_record(row.cells()).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}
