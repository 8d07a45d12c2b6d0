//! Backtest orchestration: every ticker against every selected strategy.
//!
//! `BacktestConfig` is the immutable run configuration assembled from the
//! config file and CLI overrides.

use chrono::NaiveDate;

use crate::domain::baseline::buy_and_hold;
use crate::domain::execution::SimulationConfig;
use crate::domain::ohlcv::{normalize_bars, OhlcvBar};
use crate::domain::report::{
    BacktestReport, ResultRow, SkipReason, SkippedTicker, StrategyRun, TickerResult,
};
use crate::domain::simulator::simulate;
use crate::domain::strategy::StrategySpec;
use crate::domain::tickers::Ticker;
use crate::ports::data_port::DataPort;

pub const DEFAULT_MIN_BARS: usize = 2;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub simulation: SimulationConfig,
    /// Tickers with fewer bars are skipped as "no data".
    pub min_bars: usize,
    pub tickers: Vec<Ticker>,
    pub strategies: Vec<StrategySpec>,
}

/// Fetch one ticker's bars, or say why it has to be skipped.
fn load_bars(
    data_port: &dyn DataPort,
    ticker: &Ticker,
    config: &BacktestConfig,
) -> Result<Vec<OhlcvBar>, SkipReason> {
    let bars = data_port
        .fetch_ohlcv(&ticker.symbol, config.start_date, config.end_date)
        .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;
    let bars = normalize_bars(bars);

    if bars.is_empty() {
        return Err(SkipReason::NoData);
    }
    if bars.len() < config.min_bars {
        return Err(SkipReason::InsufficientBars {
            bars: bars.len(),
            minimum: config.min_bars,
        });
    }
    Ok(bars)
}

/// Replay every (ticker, strategy) pair. Tickers that fail to load are
/// recorded as skipped and the run continues.
pub fn build_report(data_port: &dyn DataPort, config: &BacktestConfig) -> BacktestReport {
    let initial_capital = config.simulation.initial_capital;
    let mut report = BacktestReport {
        start_date: config.start_date,
        end_date: config.end_date,
        initial_capital,
        commission: config.simulation.commission,
        rows: Vec::new(),
        tickers: Vec::new(),
        skipped: Vec::new(),
    };

    for ticker in &config.tickers {
        let bars = match load_bars(data_port, ticker, config) {
            Ok(bars) => bars,
            Err(reason) => {
                tracing::warn!(ticker = %ticker.symbol, "skipping: {reason}");
                report.skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason,
                });
                continue;
            }
        };

        tracing::info!(ticker = %ticker.symbol, bars = bars.len(), "running strategies");
        let baseline_value = buy_and_hold(&bars, &config.simulation);
        let close_date = bars[bars.len() - 1].date;

        let mut runs = Vec::with_capacity(config.strategies.len());
        for spec in &config.strategies {
            let strategy = spec.build();
            let result = simulate(&bars, strategy.as_ref(), &config.simulation);
            tracing::debug!(
                ticker = %ticker.symbol,
                strategy = strategy.name(),
                final_value = result.final_value,
                trades = result.trade_count,
                "replay complete"
            );
            report.rows.push(ResultRow::new(
                ticker,
                strategy.name(),
                &result,
                baseline_value,
                initial_capital,
                close_date,
            ));
            runs.push(StrategyRun {
                key: spec.key().to_string(),
                name: strategy.name().to_string(),
                result,
            });
        }

        report.tickers.push(TickerResult {
            ticker: ticker.clone(),
            bars,
            baseline_value,
            runs,
        });
    }

    if !report.skipped.is_empty() {
        tracing::info!(
            "backtested {} of {} tickers",
            report.tickers.len(),
            config.tickers.len()
        );
    }

    report
}
