//! Configuration validation.
//!
//! Checks every `[backtest]`, `[data]` and strategy field before a run, and
//! provides the typed readers the rest of the crate uses. Unlike the plain
//! `ConfigPort` getters, a present but unparsable value is an error here, not
//! a silent fallback to the default.

use crate::domain::error::SignalbenchError;
use crate::domain::strategy::StrategyRegistry;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_min_bars(config)?;
    read_bool(config, "backtest", "fractional_shares", true)?;
    validate_dates(config)?;
    validate_tickers(config)?;
    validate_data_source(config)?;
    Ok(())
}

pub fn validate_strategy_config(
    config: &dyn ConfigPort,
    registry: &StrategyRegistry,
) -> Result<(), SignalbenchError> {
    let selection = config.get_string("backtest", "strategies");
    let specs = registry.resolve(selection.as_deref(), config)?;
    if specs.is_empty() {
        return Err(SignalbenchError::config_invalid(
            "backtest",
            "strategies",
            "no strategies selected",
        ));
    }
    Ok(())
}

fn present(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SignalbenchError> {
    match present(config, section, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                SignalbenchError::config_invalid(section, key, format!("not a number: {raw}"))
            }),
    }
}

pub fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalbenchError> {
    match present(config, section, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            SignalbenchError::config_invalid(
                section,
                key,
                format!("expected a non-negative integer, got {raw}"),
            )
        }),
    }
}

pub fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, SignalbenchError> {
    match present(config, section, key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(SignalbenchError::config_invalid(
                section,
                key,
                format!("expected true or false, got {raw}"),
            )),
        },
    }
}

pub fn read_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, SignalbenchError> {
    let raw =
        present(config, "backtest", key).ok_or_else(|| SignalbenchError::config_missing("backtest", key))?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
        SignalbenchError::config_invalid(
            "backtest",
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let value = read_f64(config, "backtest", "initial_capital", 10_000.0)?;
    if value <= 0.0 {
        return Err(SignalbenchError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let value = read_f64(config, "backtest", "commission", 0.0)?;
    if !(0.0..1.0).contains(&value) {
        return Err(SignalbenchError::config_invalid(
            "backtest",
            "commission",
            "commission must be a fraction in [0, 1)",
        ));
    }
    Ok(())
}

fn validate_min_bars(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let value = read_usize(config, "backtest", "min_bars", 2)?;
    if value < 1 {
        return Err(SignalbenchError::config_invalid(
            "backtest",
            "min_bars",
            "min_bars must be at least 1",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let start_date = read_date(config, "start_date")?;
    let end_date = read_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(SignalbenchError::config_invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    match (
        present(config, "backtest", "tickers"),
        present(config, "backtest", "tickers_file"),
    ) {
        (Some(_), Some(_)) => Err(SignalbenchError::config_invalid(
            "backtest",
            "tickers",
            "set either tickers or tickers_file, not both",
        )),
        (None, None) => Err(SignalbenchError::config_missing("backtest", "tickers")),
        _ => Ok(()),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let source = present(config, "data", "source").unwrap_or_else(|| "csv".to_string());
    match source.to_lowercase().as_str() {
        "csv" => match present(config, "data", "csv_dir") {
            Some(_) => Ok(()),
            None => Err(SignalbenchError::config_missing("data", "csv_dir")),
        },
        "yahoo" if cfg!(feature = "yahoo") => Ok(()),
        "yahoo" => Err(SignalbenchError::config_invalid(
            "data",
            "source",
            "yahoo source requires a build with the `yahoo` feature",
        )),
        other => Err(SignalbenchError::config_invalid(
            "data",
            "source",
            format!("unknown data source: {other} (expected csv or yahoo)"),
        )),
    }
}
