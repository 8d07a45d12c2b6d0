//! MACD / signal-line crossover.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::strategy::{crossover_signal, BarContext, Signal, Strategy};

/// Enter when the MACD line crosses above its signal line while flat; exit on
/// the reverse cross while holding.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdCrossover {
    name: String,
    indicator: IndicatorType,
    warmup: usize,
}

impl MacdCrossover {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, SignalbenchError> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(SignalbenchError::InvalidStrategyParams {
                strategy: "macd_crossover".into(),
                reason: "periods must be positive".into(),
            });
        }
        if fast >= slow {
            return Err(SignalbenchError::InvalidStrategyParams {
                strategy: "macd_crossover".into(),
                reason: format!("fast ({fast}) must be shorter than slow ({slow})"),
            });
        }
        Ok(Self {
            name: format!("MACD Crossover ({fast}/{slow}/{signal})"),
            indicator: IndicatorType::Macd { fast, slow, signal },
            // First bar with both a current and a previous signal value.
            warmup: slow + signal - 1,
        })
    }
}

impl Default for MacdCrossover {
    fn default() -> Self {
        Self {
            name: format!("MACD Crossover ({DEFAULT_FAST}/{DEFAULT_SLOW}/{DEFAULT_SIGNAL})"),
            indicator: IndicatorType::Macd {
                fast: DEFAULT_FAST,
                slow: DEFAULT_SLOW,
                signal: DEFAULT_SIGNAL,
            },
            warmup: DEFAULT_SLOW + DEFAULT_SIGNAL - 1,
        }
    }
}

impl Strategy for MacdCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_indicators(&self) -> Vec<IndicatorType> {
        vec![self.indicator]
    }

    fn warmup(&self) -> usize {
        self.warmup
    }

    fn evaluate(&self, ctx: &BarContext<'_>) -> Signal {
        crossover_signal(
            ctx.macd(self.indicator, 1),
            ctx.macd(self.indicator, 0),
            ctx.holding,
        )
    }
}
