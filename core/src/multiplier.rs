//! Payout multiplier progression.
//!
//! The multiplier follows a cubic ease-in from [`BASE_MULTIPLIER`] to
//! [`MAX_MULTIPLIER`] over the `total - 1` tiles a player can reveal, rounded
//! to two decimals. Clearing every tile but the last one pays the maximum.

use crate::*;

pub const BASE_MULTIPLIER: Multiplier = 1.0;
pub const MAX_MULTIPLIER: Multiplier = 25.0;

/// Multiplier reached after `revealed` safe tiles on a `grid_size`² grid.
pub fn multiplier_for(revealed: TileCount, grid_size: GridSize) -> Multiplier {
    let total = total_tiles(grid_size);
    if total < 2 {
        return MAX_MULTIPLIER;
    }

    let revealed = revealed.min(total - 1);
    if total - revealed == 1 {
        return MAX_MULTIPLIER;
    }

    let progress = f64::from(revealed) / f64::from(total - 1);
    let eased = progress * progress * progress;
    round_cents(BASE_MULTIPLIER + eased * (MAX_MULTIPLIER - BASE_MULTIPLIER))
}

/// Amount credited back to the balance when cashing out.
pub fn payout(bet: Amount, multiplier: Multiplier) -> Amount {
    bet * multiplier
}

/// Net gain of a won round.
pub fn profit(bet: Amount, multiplier: Multiplier) -> Amount {
    payout(bet, multiplier) - bet
}

/// Rounds a positive value to two decimals, ties away from zero.
fn round_cents(value: f64) -> f64 {
    // `f64::round` is not available without std
    let cents = (value * 100.0 + 0.5) as u64;
    cents as f64 / 100.0
}
