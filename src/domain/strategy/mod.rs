//! Trading strategies and the per-bar signal contract.
//!
//! A strategy sees the bar history up to and including the current bar, the
//! indicator series it asked for, and whether the account currently holds a
//! position. It answers with one [`Signal`] per bar. All strategies are long
//! only with at most one open position.

pub mod macd_crossover;
pub mod registry;
pub mod rsi_threshold;
pub mod sma_crossover;

use std::collections::HashMap;
use std::fmt;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub use macd_crossover::MacdCrossover;
pub use registry::{StrategyRegistry, StrategySpec};
pub use rsi_threshold::RsiThreshold;
pub use sma_crossover::SmaCrossover;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    None,
    Enter,
    Exit,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::None => write!(f, "NONE"),
            Signal::Enter => write!(f, "ENTER"),
            Signal::Exit => write!(f, "EXIT"),
        }
    }
}

/// What a strategy may look at when deciding on the current bar.
pub struct BarContext<'a> {
    /// Bars `0..=index`; never empty.
    pub history: &'a [OhlcvBar],
    /// Series covering the whole replay. Only read at indices `<= index()`.
    pub indicators: &'a HashMap<IndicatorType, IndicatorSeries>,
    pub holding: bool,
}

impl<'a> BarContext<'a> {
    pub fn index(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    pub fn current(&self) -> Option<&'a OhlcvBar> {
        self.history.last()
    }

    /// Single-valued indicator `bars_ago` bars before the current one.
    pub fn simple(&self, indicator: IndicatorType, bars_ago: usize) -> Option<f64> {
        let index = self.index().checked_sub(bars_ago)?;
        self.indicators.get(&indicator)?.simple_at(index)
    }

    /// MACD `(line, signal)` `bars_ago` bars before the current one.
    pub fn macd(&self, indicator: IndicatorType, bars_ago: usize) -> Option<(f64, f64)> {
        let index = self.index().checked_sub(bars_ago)?;
        self.indicators.get(&indicator)?.macd_at(index)
    }
}

pub trait Strategy {
    /// Display name used in reports.
    fn name(&self) -> &str;

    /// Indicators the simulator must compute before the replay.
    fn required_indicators(&self) -> Vec<IndicatorType>;

    /// Number of leading bars during which the strategy always abstains.
    fn warmup(&self) -> usize;

    fn evaluate(&self, ctx: &BarContext<'_>) -> Signal;
}

/// `a` moved from at-or-below `b` to strictly above it.
pub fn crossed_above(prev: (f64, f64), curr: (f64, f64)) -> bool {
    prev.0 <= prev.1 && curr.0 > curr.1
}

/// `a` moved from at-or-above `b` to strictly below it.
pub fn crossed_below(prev: (f64, f64), curr: (f64, f64)) -> bool {
    prev.0 >= prev.1 && curr.0 < curr.1
}

/// Map a two-line crossover to a signal given the holding state.
pub(crate) fn crossover_signal(
    prev: Option<(f64, f64)>,
    curr: Option<(f64, f64)>,
    holding: bool,
) -> Signal {
    let (Some(prev), Some(curr)) = (prev, curr) else {
        return Signal::None;
    };
    if !holding && crossed_above(prev, curr) {
        Signal::Enter
    } else if holding && crossed_below(prev, curr) {
        Signal::Exit
    } else {
        Signal::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_display() {
        assert_eq!(Signal::None.to_string(), "NONE");
        assert_eq!(Signal::Enter.to_string(), "ENTER");
        assert_eq!(Signal::Exit.to_string(), "EXIT");
        assert_eq!(Signal::default(), Signal::None);
    }

    #[test]
    fn crossed_above_needs_strict_move() {
        assert!(crossed_above((1.0, 1.0), (2.0, 1.0)));
        assert!(crossed_above((0.5, 1.0), (1.5, 1.0)));
        assert!(!crossed_above((2.0, 1.0), (3.0, 1.0)));
        assert!(!crossed_above((0.5, 1.0), (1.0, 1.0)));
    }

    #[test]
    fn crossed_below_needs_strict_move() {
        assert!(crossed_below((1.0, 1.0), (0.5, 1.0)));
        assert!(!crossed_below((0.5, 1.0), (0.4, 1.0)));
        assert!(!crossed_below((1.5, 1.0), (1.0, 1.0)));
    }

    #[test]
    fn crossover_signal_respects_holding_state() {
        let up = (Some((1.0, 2.0)), Some((3.0, 2.0)));
        let down = (Some((3.0, 2.0)), Some((1.0, 2.0)));

        assert_eq!(crossover_signal(up.0, up.1, false), Signal::Enter);
        assert_eq!(crossover_signal(up.0, up.1, true), Signal::None);
        assert_eq!(crossover_signal(down.0, down.1, true), Signal::Exit);
        assert_eq!(crossover_signal(down.0, down.1, false), Signal::None);
        assert_eq!(crossover_signal(None, up.1, false), Signal::None);
    }

    #[test]
    fn bar_context_lookback_past_start_is_none() {
        let indicators = HashMap::new();
        let ctx = BarContext {
            history: &[],
            indicators: &indicators,
            holding: false,
        };
        assert_eq!(ctx.index(), 0);
        assert!(ctx.current().is_none());
        assert_eq!(ctx.simple(IndicatorType::Sma(2), 1), None);
    }
}
