//! HTML report adapter implementing ReportPort.
//!
//! Renders the results table, skipped tickers and one inline SVG price chart
//! per ticker through an Askama template.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::adapters::chart_svg::render_price_chart;
use crate::domain::error::SignalbenchError;
use crate::domain::report::{BacktestReport, ResultRow, COLUMNS};
use crate::ports::report_port::ReportPort;

struct CellView {
    text: String,
    numeric: bool,
}

struct RowView {
    class: &'static str,
    cells: Vec<CellView>,
}

impl RowView {
    fn from_row(row: &ResultRow) -> Self {
        let class = if row.profit > 0.0 {
            "gain"
        } else if row.profit < 0.0 {
            "loss"
        } else {
            ""
        };
        let cells = row
            .cells()
            .into_iter()
            .enumerate()
            .map(|(i, text)| CellView {
                text,
                numeric: matches!(i, 3 | 4 | 5 | 7 | 9 | 10),
            })
            .collect();
        RowView { class, cells }
    }
}

struct SkippedView {
    ticker: String,
    name: String,
    reason: String,
}

struct ChartView {
    svg: String,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    start_date: String,
    end_date: String,
    initial_capital: String,
    commission: String,
    columns: &'static [&'static str],
    rows: Vec<RowView>,
    skipped: Vec<SkippedView>,
    charts: Vec<ChartView>,
    marker_strategy: String,
}

pub struct HtmlReportAdapter {
    sma_periods: Vec<usize>,
    marker_key: String,
}

impl HtmlReportAdapter {
    pub fn new(sma_periods: Vec<usize>, marker_key: impl Into<String>) -> Self {
        Self {
            sma_periods,
            marker_key: marker_key.into(),
        }
    }

    fn render(&self, report: &BacktestReport) -> Result<String, SignalbenchError> {
        let marker_strategy = report
            .tickers
            .iter()
            .find_map(|t| t.run(&self.marker_key))
            .map(|run| run.name.clone())
            .unwrap_or_else(|| self.marker_key.clone());

        let template = ReportTemplate {
            start_date: report.start_date.to_string(),
            end_date: report.end_date.to_string(),
            initial_capital: format!("{:.2}", report.initial_capital),
            commission: format!("{:.3}%", report.commission * 100.0),
            columns: &COLUMNS,
            rows: report.rows.iter().map(RowView::from_row).collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedView {
                    ticker: s.ticker.symbol.clone(),
                    name: s.ticker.name.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            charts: report
                .tickers
                .iter()
                .map(|t| ChartView {
                    svg: render_price_chart(t, &self.sma_periods, &self.marker_key),
                })
                .collect(),
            marker_strategy,
        };

        template.render().map_err(|e| SignalbenchError::Report {
            reason: format!("failed to render HTML report: {e}"),
        })
    }
}

impl ReportPort for HtmlReportAdapter {
    fn format_name(&self) -> &'static str {
        "html"
    }

    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SignalbenchError> {
        let html = self.render(report)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        Ok(())
    }
}
