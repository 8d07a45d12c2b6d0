//! Shared helpers for indicator calculations.

use std::collections::HashMap;

use crate::domain::indicator::{
    calculate_macd, calculate_rsi, calculate_sma, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn compute_indicator(bars: &[OhlcvBar], indicator: IndicatorType) -> IndicatorSeries {
    match indicator {
        IndicatorType::Sma(period) => calculate_sma(bars, period),
        IndicatorType::Rsi(period) => calculate_rsi(bars, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
    }
}

/// Compute each requested indicator once; duplicates share one series.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    indicators: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(indicators.len());
    for &indicator in indicators {
        out.entry(indicator)
            .or_insert_with(|| compute_indicator(bars, indicator));
    }
    out
}
