//! Spreadsheet export. Only compiled with the `xlsx` feature; without it
//! [`xlsx_exporter`] returns `None` and the caller skips the export.

use crate::ports::report_port::ReportPort;

#[cfg(feature = "xlsx")]
pub use enabled::XlsxReportAdapter;

/// The XLSX exporter, if this build has one.
pub fn xlsx_exporter() -> Option<Box<dyn ReportPort>> {
    #[cfg(feature = "xlsx")]
    {
        Some(Box::new(XlsxReportAdapter))
    }
    #[cfg(not(feature = "xlsx"))]
    {
        None
    }
}

#[cfg(feature = "xlsx")]
mod enabled {
    use std::fs;
    use std::path::Path;

    use rust_xlsxwriter::{Format, Workbook, XlsxError};

    use crate::domain::error::SignalbenchError;
    use crate::domain::report::{BacktestReport, COLUMNS};
    use crate::ports::report_port::ReportPort;

    pub struct XlsxReportAdapter;

    fn report_error(e: XlsxError) -> SignalbenchError {
        SignalbenchError::Report {
            reason: format!("xlsx export failed: {e}"),
        }
    }

    impl ReportPort for XlsxReportAdapter {
        fn format_name(&self) -> &'static str {
            "xlsx"
        }

        fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SignalbenchError> {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let mut workbook = Workbook::new();
            let header = Format::new().set_bold();
            let money = Format::new().set_num_format("0.00");

            let sheet = workbook.add_worksheet();
            sheet.set_name("Results").map_err(report_error)?;
            for (col, title) in COLUMNS.iter().enumerate() {
                sheet
                    .write_string_with_format(0, col as u16, *title, &header)
                    .map_err(report_error)?;
            }

            for (i, row) in report.rows.iter().enumerate() {
                let r = i as u32 + 1;
                let numbers = [
                    (3, row.final_value),
                    (4, row.profit),
                    (5, row.profit_pct),
                    (9, row.baseline_value),
                    (10, row.vs_baseline),
                ];
                sheet.write_string(r, 0, &row.ticker).map_err(report_error)?;
                sheet.write_string(r, 1, &row.name).map_err(report_error)?;
                sheet.write_string(r, 2, &row.strategy).map_err(report_error)?;
                for (col, value) in numbers {
                    sheet
                        .write_number_with_format(r, col, value, &money)
                        .map_err(report_error)?;
                }
                sheet
                    .write_string(r, 6, row.close_date.to_string())
                    .map_err(report_error)?;
                sheet
                    .write_number(r, 7, row.trade_count as f64)
                    .map_err(report_error)?;
                sheet
                    .write_string(r, 8, row.last_signal.to_string())
                    .map_err(report_error)?;
            }
            sheet.autofit();

            workbook.save(output_path).map_err(report_error)?;
            Ok(())
        }
    }
}
