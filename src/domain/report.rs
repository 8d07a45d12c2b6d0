//! Result rows and the assembled backtest report.
//!
//! Values are stored unrounded; [`ResultRow::cells`] rounds to two decimals
//! for every text renderer.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::simulator::SimulationResult;
use crate::domain::strategy::Signal;
use crate::domain::tickers::Ticker;

pub const COLUMNS: [&str; 11] = [
    "Ticker",
    "Name",
    "Strategy",
    "Final Value",
    "Profit",
    "Profit %",
    "Close Date",
    "Trades",
    "Last Signal",
    "Baseline",
    "Vs Baseline",
];

/// One (ticker, strategy) outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub ticker: String,
    pub name: String,
    pub strategy: String,
    pub final_value: f64,
    pub profit: f64,
    pub profit_pct: f64,
    pub close_date: NaiveDate,
    pub trade_count: usize,
    pub last_signal: Signal,
    pub baseline_value: f64,
    /// Strategy profit minus baseline profit.
    pub vs_baseline: f64,
}

impl ResultRow {
    pub fn new(
        ticker: &Ticker,
        strategy: &str,
        result: &SimulationResult,
        baseline_value: f64,
        initial_capital: f64,
        close_date: NaiveDate,
    ) -> Self {
        let profit = result.final_value - initial_capital;
        let profit_pct = if initial_capital > 0.0 {
            profit / initial_capital * 100.0
        } else {
            0.0
        };
        let baseline_profit = baseline_value - initial_capital;
        ResultRow {
            ticker: ticker.symbol.clone(),
            name: ticker.name.clone(),
            strategy: strategy.to_string(),
            final_value: result.final_value,
            profit,
            profit_pct,
            close_date,
            trade_count: result.trade_count,
            last_signal: result.last_signal,
            baseline_value,
            vs_baseline: profit - baseline_profit,
        }
    }

    /// Display cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [String; 11] {
        [
            self.ticker.clone(),
            self.name.clone(),
            self.strategy.clone(),
            format!("{:.2}", self.final_value),
            format!("{:.2}", self.profit),
            format!("{:.2}", self.profit_pct),
            self.close_date.to_string(),
            self.trade_count.to_string(),
            self.last_signal.to_string(),
            format!("{:.2}", self.baseline_value),
            format!("{:.2}", self.vs_baseline),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
    InsufficientBars { bars: usize, minimum: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "only {bars} bars, minimum {minimum} required")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: Ticker,
    pub reason: SkipReason,
}

/// A single strategy replay kept for charts and the HTML report.
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub key: String,
    pub name: String,
    pub result: SimulationResult,
}

#[derive(Debug, Clone)]
pub struct TickerResult {
    pub ticker: Ticker,
    pub bars: Vec<OhlcvBar>,
    pub baseline_value: f64,
    pub runs: Vec<StrategyRun>,
}

impl TickerResult {
    pub fn run(&self, key: &str) -> Option<&StrategyRun> {
        self.runs.iter().find(|r| r.key == key)
    }
}

#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub commission: f64,
    pub rows: Vec<ResultRow>,
    pub tickers: Vec<TickerResult>,
    pub skipped: Vec<SkippedTicker>,
}

impl BacktestReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
