//! Static strategy registry.
//!
//! Maps a strategy key (also its config section name) to a constructor. The
//! set is fixed at compile time.

use crate::domain::config_validation::{read_f64, read_usize};
use crate::domain::error::SignalbenchError;
use crate::domain::strategy::{MacdCrossover, RsiThreshold, SmaCrossover, Strategy};
use crate::ports::config_port::ConfigPort;

/// Validated, immutable strategy parameters. `build` yields a fresh instance.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategySpec {
    SmaCrossover(SmaCrossover),
    RsiThreshold(RsiThreshold),
    MacdCrossover(MacdCrossover),
}

impl StrategySpec {
    pub fn key(&self) -> &'static str {
        match self {
            StrategySpec::SmaCrossover(_) => "sma_crossover",
            StrategySpec::RsiThreshold(_) => "rsi_threshold",
            StrategySpec::MacdCrossover(_) => "macd_crossover",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StrategySpec::SmaCrossover(s) => s.name(),
            StrategySpec::RsiThreshold(s) => s.name(),
            StrategySpec::MacdCrossover(s) => s.name(),
        }
    }

    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategySpec::SmaCrossover(s) => Box::new(s.clone()),
            StrategySpec::RsiThreshold(s) => Box::new(s.clone()),
            StrategySpec::MacdCrossover(s) => Box::new(s.clone()),
        }
    }
}

pub type SpecFactory = fn(&dyn ConfigPort) -> Result<StrategySpec, SignalbenchError>;

pub struct RegistryEntry {
    pub key: &'static str,
    pub description: &'static str,
    pub params: &'static str,
    pub factory: SpecFactory,
}

pub struct StrategyRegistry {
    entries: Vec<RegistryEntry>,
}

impl StrategyRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                RegistryEntry {
                    key: "sma_crossover",
                    description: "SMA(fast) crossing SMA(slow)",
                    params: "fast = 10, slow = 30",
                    factory: sma_crossover_from_config,
                },
                RegistryEntry {
                    key: "rsi_threshold",
                    description: "RSI below oversold / above overbought",
                    params: "period = 14, oversold = 30, overbought = 70",
                    factory: rsi_threshold_from_config,
                },
                RegistryEntry {
                    key: "macd_crossover",
                    description: "MACD line crossing its signal line",
                    params: "fast = 12, slow = 26, signal = 9",
                    factory: macd_crossover_from_config,
                },
            ],
        }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        let key = key.trim().to_lowercase();
        self.entries.iter().find(|e| e.key == key)
    }

    /// Build the spec for `key`, reading parameters from its config section.
    pub fn build_spec(
        &self,
        key: &str,
        config: &dyn ConfigPort,
    ) -> Result<StrategySpec, SignalbenchError> {
        let entry = self.get(key).ok_or_else(|| SignalbenchError::UnknownStrategy {
            name: key.trim().to_string(),
        })?;
        (entry.factory)(config)
    }

    /// Resolve a comma-separated selection; `None` or blank selects every strategy.
    pub fn resolve(
        &self,
        selection: Option<&str>,
        config: &dyn ConfigPort,
    ) -> Result<Vec<StrategySpec>, SignalbenchError> {
        let keys: Vec<String> = match selection.map(str::trim).filter(|s| !s.is_empty()) {
            Some(list) => list
                .split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            None => self.keys().into_iter().map(String::from).collect(),
        };

        let mut specs: Vec<StrategySpec> = Vec::with_capacity(keys.len());
        for key in keys {
            let spec = self.build_spec(&key, config)?;
            if !specs.iter().any(|s| s.key() == spec.key()) {
                specs.push(spec);
            }
        }
        Ok(specs)
    }
}

fn sma_crossover_from_config(config: &dyn ConfigPort) -> Result<StrategySpec, SignalbenchError> {
    use crate::domain::strategy::sma_crossover::{DEFAULT_FAST, DEFAULT_SLOW};
    let fast = read_usize(config, "sma_crossover", "fast", DEFAULT_FAST)?;
    let slow = read_usize(config, "sma_crossover", "slow", DEFAULT_SLOW)?;
    Ok(StrategySpec::SmaCrossover(SmaCrossover::new(fast, slow)?))
}

fn rsi_threshold_from_config(config: &dyn ConfigPort) -> Result<StrategySpec, SignalbenchError> {
    use crate::domain::indicator::rsi::DEFAULT_PERIOD;
    use crate::domain::strategy::rsi_threshold::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
    let period = read_usize(config, "rsi_threshold", "period", DEFAULT_PERIOD)?;
    let oversold = read_f64(config, "rsi_threshold", "oversold", DEFAULT_OVERSOLD)?;
    let overbought = read_f64(config, "rsi_threshold", "overbought", DEFAULT_OVERBOUGHT)?;
    Ok(StrategySpec::RsiThreshold(RsiThreshold::new(
        period, oversold, overbought,
    )?))
}

fn macd_crossover_from_config(config: &dyn ConfigPort) -> Result<StrategySpec, SignalbenchError> {
    use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
    let fast = read_usize(config, "macd_crossover", "fast", DEFAULT_FAST)?;
    let slow = read_usize(config, "macd_crossover", "slow", DEFAULT_SLOW)?;
    let signal = read_usize(config, "macd_crossover", "signal", DEFAULT_SIGNAL)?;
    Ok(StrategySpec::MacdCrossover(MacdCrossover::new(
        fast, slow, signal,
    )?))
}
