#![allow(dead_code)]

use chrono::NaiveDate;
use signalbench::domain::backtest::BacktestConfig;
use signalbench::domain::error::SignalbenchError;
use signalbench::domain::execution::SimulationConfig;
pub use signalbench::domain::ohlcv::OhlcvBar;
use signalbench::domain::strategy::{MacdCrossover, RsiThreshold, SmaCrossover, StrategySpec};
use signalbench::domain::tickers::Ticker;
use signalbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalbenchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalbenchError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting 2024-01-01, closing at each price in turn.
pub fn bars_from_closes(ticker: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            ticker: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn simulation(initial_capital: f64, commission: f64) -> SimulationConfig {
    SimulationConfig {
        initial_capital,
        commission,
        fractional_shares: true,
    }
}

pub fn all_strategies() -> Vec<StrategySpec> {
    vec![
        StrategySpec::SmaCrossover(SmaCrossover::default()),
        StrategySpec::RsiThreshold(RsiThreshold::default()),
        StrategySpec::MacdCrossover(MacdCrossover::default()),
    ]
}

pub fn sample_config(tickers: &[&str]) -> BacktestConfig {
    BacktestConfig {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        simulation: simulation(1_000.0, 0.0),
        min_bars: 2,
        tickers: tickers.iter().map(|t| Ticker::new(t, "")).collect(),
        strategies: all_strategies(),
    }
}
