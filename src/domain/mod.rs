//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod account;
pub mod execution;
pub mod indicator;
pub mod indicator_helpers;
pub mod strategy;
pub mod simulator;
pub mod baseline;
pub mod tickers;
pub mod report;
pub mod backtest;
pub mod config_validation;
pub mod error;
