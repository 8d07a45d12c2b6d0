//! Plain-text results table for stdout.

use crate::domain::report::{BacktestReport, COLUMNS};

/// Text columns are left-aligned, numeric ones right-aligned.
const LEFT_ALIGNED: [bool; 11] = [
    true, true, true, false, false, false, true, false, true, false, false,
];

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .zip(widths.iter().zip(LEFT_ALIGNED.iter()))
        .map(|(cell, (&width, &left))| {
            if left {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    line.join("  ").trim_end().to_string()
}

pub fn format_results_table(report: &BacktestReport) -> String {
    let rows: Vec<[String; 11]> = report.rows.iter().map(|r| r.cells()).collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&render_line(COLUMNS.iter().copied(), &widths));
    out.push('\n');
    let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        out.push_str(&format!("\nSkipped {} ticker(s):\n", report.skipped.len()));
        for s in &report.skipped {
            out.push_str(&format!("  {}: {}\n", s.ticker.symbol, s.reason));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{ResultRow, SkipReason, SkippedTicker};
    use crate::domain::strategy::Signal;
    use crate::domain::tickers::Ticker;
    use chrono::NaiveDate;

    fn report() -> BacktestReport {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        BacktestReport {
            start_date: date,
            end_date: date,
            initial_capital: 1_000.0,
            commission: 0.0,
            rows: vec![ResultRow {
                ticker: "MSFT".into(),
                name: "Microsoft".into(),
                strategy: "RSI Threshold (14, 30/70)".into(),
                final_value: 1_050.0,
                profit: 50.0,
                profit_pct: 5.0,
                close_date: date,
                trade_count: 2,
                last_signal: Signal::None,
                baseline_value: 1_020.004,
                vs_baseline: 29.996,
            }],
            tickers: Vec::new(),
            skipped: vec![SkippedTicker {
                ticker: Ticker::new("XYZ", ""),
                reason: SkipReason::NoData,
            }],
        }
    }

    #[test]
    fn table_has_header_rule_and_rows() {
        let table = format_results_table(&report());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("Ticker  Name"));
        assert!(lines[0].ends_with("Vs Baseline"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("MSFT"));
        assert!(lines[2].contains("1050.00"));
        assert!(lines[2].contains("1020.00"));
        assert!(lines[2].ends_with("30.00"));
    }

    #[test]
    fn skipped_tickers_listed() {
        let table = format_results_table(&report());
        assert!(table.contains("Skipped 1 ticker(s):"));
        assert!(table.contains("  XYZ: no data"));
    }

    #[test]
    fn columns_line_up() {
        let table = format_results_table(&report());
        let lines: Vec<&str> = table.lines().collect();
        let header_pos = lines[0].find("Strategy").unwrap();
        let row_pos = lines[2].find("RSI").unwrap();
        assert_eq!(header_pos, row_pos);
    }
}
