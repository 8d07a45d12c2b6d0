//! Simple moving-average crossover.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::strategy::{crossover_signal, BarContext, Signal, Strategy};

pub const DEFAULT_FAST: usize = 10;
pub const DEFAULT_SLOW: usize = 30;

/// Enter when SMA(fast) crosses above SMA(slow) while flat; exit on the
/// reverse cross while holding.
#[derive(Debug, Clone, PartialEq)]
pub struct SmaCrossover {
    name: String,
    fast: usize,
    slow: usize,
}

impl SmaCrossover {
    pub fn new(fast: usize, slow: usize) -> Result<Self, SignalbenchError> {
        if fast == 0 || slow == 0 {
            return Err(SignalbenchError::InvalidStrategyParams {
                strategy: "sma_crossover".into(),
                reason: "periods must be positive".into(),
            });
        }
        if fast >= slow {
            return Err(SignalbenchError::InvalidStrategyParams {
                strategy: "sma_crossover".into(),
                reason: format!("fast ({fast}) must be shorter than slow ({slow})"),
            });
        }
        Ok(Self {
            name: format!("SMA Crossover ({fast}/{slow})"),
            fast,
            slow,
        })
    }

    pub fn fast(&self) -> usize {
        self.fast
    }

    pub fn slow(&self) -> usize {
        self.slow
    }

    fn lines(&self, ctx: &BarContext<'_>, bars_ago: usize) -> Option<(f64, f64)> {
        let fast = ctx.simple(IndicatorType::Sma(self.fast), bars_ago)?;
        let slow = ctx.simple(IndicatorType::Sma(self.slow), bars_ago)?;
        Some((fast, slow))
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        Self {
            name: format!("SMA Crossover ({DEFAULT_FAST}/{DEFAULT_SLOW})"),
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
        }
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Sma(self.fast), IndicatorType::Sma(self.slow)]
    }

    fn warmup(&self) -> usize {
        self.slow
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Signal {
        crossover_signal(self.lines(ctx, 1), self.lines(ctx, 0), ctx.holding)
    }
}
