//! Trade execution and fill simulation.
//!
//! All-in long entries and full exits at the bar close, with a commission
//! charged as a fraction of trade notional.

use chrono::NaiveDate;

use super::account::Account;
use super::position::{ClosedTrade, Fill, Position, Side};

/// Immutable execution parameters for one replay.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fraction of trade notional, e.g. 0.001 for 0.1%.
    pub commission: f64,
    pub fractional_shares: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_capital: 10_000.0,
            commission: 0.0,
            fractional_shares: true,
        }
    }
}

pub fn calculate_commission(trade_value: f64, config: &SimulationConfig) -> f64 {
    trade_value * config.commission
}

/// Largest quantity whose cost plus commission fits in `cash`.
pub fn entry_quantity(cash: f64, price: f64, config: &SimulationConfig) -> f64 {
    if cash <= 0.0 || price <= 0.0 || !price.is_finite() {
        return 0.0;
    }
    let raw = cash / (price * (1.0 + config.commission));
    if config.fractional_shares {
        raw
    } else {
        raw.floor()
    }
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        quantity: f64,
        execution_price: f64,
        cost: f64,
        commission: f64,
    },
    AlreadyHolding,
    InsufficientCapital,
}

/// Buy with all available cash at `price`.
pub fn enter_long(
    account: &mut Account,
    ticker: &str,
    price: f64,
    date: NaiveDate,
    config: &SimulationConfig,
) -> EntryResult {
    if !account.is_flat() {
        return EntryResult::AlreadyHolding;
    }

    let quantity = entry_quantity(account.cash, price, config);
    if quantity <= 0.0 {
        return EntryResult::InsufficientCapital;
    }

    let cost = quantity * price;
    let commission = calculate_commission(cost, config);

    // Rounding can leave a sub-cent negative balance when all cash is spent.
    account.cash = (account.cash - cost - commission).max(0.0);
    account.position = Some(Position {
        ticker: ticker.to_string(),
        quantity,
        entry_price: price,
        entry_date: date,
        entry_commission: commission,
    });
    account.record_fill(Fill {
        date,
        side: Side::Buy,
        quantity,
        price,
        commission,
    });

    EntryResult::Entered {
        quantity,
        execution_price: price,
        cost,
        commission,
    }
}

/// Result of an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitResult {
    pub quantity: f64,
    pub exit_price: f64,
    pub exit_value: f64,
    pub exit_commission: f64,
    pub pnl: f64,
}

/// Sell the whole position at `price`. Returns `None` when flat.
pub fn exit_position(
    account: &mut Account,
    price: f64,
    exit_date: NaiveDate,
    config: &SimulationConfig,
) -> Option<ExitResult> {
    let position = account.position.take()?;

    let exit_value = position.market_value(price);
    let exit_commission = calculate_commission(exit_value, config);
    let pnl = position.unrealized_pnl(price) - position.entry_commission - exit_commission;

    account.cash += exit_value - exit_commission;
    account.record_fill(Fill {
        date: exit_date,
        side: Side::Sell,
        quantity: position.quantity,
        price,
        commission: exit_commission,
    });
    account.record_trade(ClosedTrade {
        ticker: position.ticker,
        quantity: position.quantity,
        entry_price: position.entry_price,
        exit_price: price,
        entry_date: position.entry_date,
        exit_date,
        pnl,
    });

    Some(ExitResult {
        quantity: position.quantity,
        exit_price: price,
        exit_value,
        exit_commission,
        pnl,
    })
}
