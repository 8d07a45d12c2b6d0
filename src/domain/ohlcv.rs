//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Sort bars ascending by date and drop repeated dates, keeping the last one seen.
pub fn normalize_bars(mut bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            ticker: "AAPL".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn normalize_sorts_by_date() {
        let bars = vec![
            bar("2024-01-03", 3.0),
            bar("2024-01-01", 1.0),
            bar("2024-01-02", 2.0),
        ];
        let out = normalize_bars(bars);
        let closes: Vec<f64> = out.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn normalize_drops_duplicate_dates() {
        let bars = vec![
            bar("2024-01-01", 1.0),
            bar("2024-01-02", 2.0),
            bar("2024-01-02", 2.5),
        ];
        let out = normalize_bars(bars);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].close, 2.5);
    }

    #[test]
    fn normalize_empty() {
        assert!(normalize_bars(Vec::new()).is_empty());
    }
}
