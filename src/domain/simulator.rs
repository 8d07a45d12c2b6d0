//! Single-ticker bar replay.
//!
//! Feeds bars one at a time to a [`Strategy`], acts on its signals with all-in
//! entries and full exits at the bar close, and marks the account to market
//! after every bar.

use crate::domain::account::{Account, EquityPoint};
use crate::domain::execution::{enter_long, exit_position, EntryResult, SimulationConfig};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::{ClosedTrade, Fill};
use crate::domain::strategy::{BarContext, Signal, Strategy};

/// Outcome of one (ticker, strategy) replay.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Cash plus any open position marked at the last close.
    pub final_value: f64,
    /// Executed fills; an entry and an exit each count once.
    pub trade_count: usize,
    /// Signal emitted on the final bar.
    pub last_signal: Signal,
    pub fills: Vec<Fill>,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl SimulationResult {
    fn from_account(account: Account, final_value: f64, last_signal: Signal) -> Self {
        SimulationResult {
            final_value,
            trade_count: account.fills.len(),
            last_signal,
            fills: account.fills,
            closed_trades: account.closed_trades,
            equity_curve: account.equity_curve,
        }
    }
}

pub fn simulate(
    bars: &[OhlcvBar],
    strategy: &dyn Strategy,
    config: &SimulationConfig,
) -> SimulationResult {
    let mut account = Account::new(config.initial_capital);

    let Some(last_bar) = bars.last() else {
        return SimulationResult::from_account(account, config.initial_capital, Signal::None);
    };

    let indicators = compute_indicators(bars, &strategy.required_indicators());
    let mut last_signal = Signal::None;

    for (i, bar) in bars.iter().enumerate() {
        let ctx = BarContext {
            history: &bars[..=i],
            indicators: &indicators,
            holding: !account.is_flat(),
        };
        let signal = if i < strategy.warmup() {
            Signal::None
        } else {
            strategy.evaluate(&ctx)
        };

        match signal {
            Signal::Enter if account.is_flat() => {
                if let EntryResult::InsufficientCapital =
                    enter_long(&mut account, &bar.ticker, bar.close, bar.date, config)
                {
                    tracing::debug!(ticker = %bar.ticker, date = %bar.date, "entry skipped: zero quantity");
                }
            }
            Signal::Exit => {
                exit_position(&mut account, bar.close, bar.date, config);
            }
            _ => {}
        }

        let equity = account.total_equity(bar.close);
        account.record_equity(bar.date, equity);
        last_signal = signal;
    }

    let final_value = account.total_equity(last_bar.close);
    SimulationResult::from_account(account, final_value, last_signal)
}
