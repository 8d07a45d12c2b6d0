//! Buy-and-hold baseline.

use crate::domain::execution::{entry_quantity, SimulationConfig};
use crate::domain::ohlcv::OhlcvBar;

/// Terminal value of buying at the first close and holding to the last.
///
/// Follows the simulator's conventions: entry commission is paid, the
/// holding is marked at the last close without an exit commission, and
/// whole-share mode leaves the remainder in cash.
pub fn buy_and_hold(bars: &[OhlcvBar], config: &SimulationConfig) -> f64 {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return config.initial_capital;
    };

    let quantity = entry_quantity(config.initial_capital, first.close, config);
    if quantity <= 0.0 {
        return config.initial_capital;
    }
    let cost = quantity * first.close * (1.0 + config.commission);
    let cash = (config.initial_capital - cost).max(0.0);
    cash + quantity * last.close
}
