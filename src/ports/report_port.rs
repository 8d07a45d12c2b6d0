//! Report export port.

use std::path::Path;

use crate::domain::error::SignalbenchError;
use crate::domain::report::BacktestReport;

/// Port for writing a finished backtest report to disk.
pub trait ReportPort {
    /// Short format label used in log messages, e.g. "csv".
    fn format_name(&self) -> &'static str;

    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SignalbenchError>;
}
