//! RSI oversold/overbought threshold strategy.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::rsi::DEFAULT_PERIOD;
use crate::domain::strategy::{BarContext, Signal, Strategy};

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

/// Enter when RSI drops below `oversold` while flat; exit when it rises above
/// `overbought` while holding.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiThreshold {
    name: String,
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiThreshold {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, SignalbenchError> {
        let invalid = |reason: String| SignalbenchError::InvalidStrategyParams {
            strategy: "rsi_threshold".into(),
            reason,
        };
        if period == 0 {
            return Err(invalid("period must be positive".into()));
        }
        if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
            return Err(invalid("thresholds must be within 0..=100".into()));
        }
        if oversold >= overbought {
            return Err(invalid(format!(
                "oversold ({oversold}) must be below overbought ({overbought})"
            )));
        }
        Ok(Self {
            name: format!("RSI Threshold ({period}, {oversold}/{overbought})"),
            period,
            oversold,
            overbought,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.oversold, self.overbought)
    }
}

impl Default for RsiThreshold {
    fn default() -> Self {
        Self {
            name: format!(
                "RSI Threshold ({DEFAULT_PERIOD}, {DEFAULT_OVERSOLD}/{DEFAULT_OVERBOUGHT})"
            ),
            period: DEFAULT_PERIOD,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

impl Strategy for RsiThreshold {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Rsi(self.period)]
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Signal {
        let Some(rsi) = ctx.simple(IndicatorType::Rsi(self.period), 0) else {
            return Signal::None;
        };
        if !ctx.holding && rsi < self.oversold {
            Signal::Enter
        } else if ctx.holding && rsi > self.overbought {
            Signal::Exit
        } else {
            Signal::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator_helpers::compute_indicators;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                ticker: "TEST".into(),
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn last_signal(strategy: &RsiThreshold, prices: &[f64], holding: bool) -> Signal {
        let bars = make_bars(prices);
        let indicators = compute_indicators(&bars, &strategy.required_indicators());
        strategy.evaluate(&BarContext {
            history: &bars,
            indicators: &indicators,
            holding,
        })
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(RsiThreshold::new(0, 30.0, 70.0).is_err());
        assert!(RsiThreshold::new(14, 70.0, 30.0).is_err());
        assert!(RsiThreshold::new(14, 50.0, 50.0).is_err());
        assert!(RsiThreshold::new(14, -1.0, 70.0).is_err());
        assert!(RsiThreshold::new(14, 30.0, 101.0).is_err());
        assert!(RsiThreshold::new(14, 30.0, 70.0).is_ok());
    }

    #[test]
    fn default_parameters() {
        let s = RsiThreshold::default();
        assert_eq!(s.period(), 14);
        assert_eq!(s.thresholds(), (30.0, 70.0));
        assert_eq!(s, RsiThreshold::new(14, 30.0, 70.0).unwrap());
    }

    #[test]
    fn enters_when_oversold_and_flat() {
        let s = RsiThreshold::new(3, 30.0, 70.0).unwrap();
        let falling = [10.0, 9.0, 8.0, 7.0, 6.0];
        assert_eq!(last_signal(&s, &falling, false), Signal::Enter);
        assert_eq!(last_signal(&s, &falling, true), Signal::None);
    }

    #[test]
    fn exits_when_overbought_and_holding() {
        let s = RsiThreshold::new(3, 30.0, 70.0).unwrap();
        let rising = [10.0, 11.0, 12.0, 13.0, 14.0];
        assert_eq!(last_signal(&s, &rising, true), Signal::Exit);
        assert_eq!(last_signal(&s, &rising, false), Signal::None);
    }

    #[test]
    fn abstains_during_warmup() {
        let s = RsiThreshold::new(5, 30.0, 70.0).unwrap();
        let falling = [10.0, 9.0, 8.0, 7.0, 6.0];
        assert_eq!(last_signal(&s, &falling, false), Signal::None);
    }

    #[test]
    fn neutral_rsi_is_none() {
        let s = RsiThreshold::new(2, 30.0, 70.0).unwrap();
        // changes +1, -1 -> RSI 50
        let prices = [10.0, 11.0, 10.0];
        assert_eq!(last_signal(&s, &prices, false), Signal::None);
        assert_eq!(last_signal(&s, &prices, true), Signal::None);
    }
}
