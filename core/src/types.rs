/// Side length of the square grid.
pub type GridSize = u8;

/// Linear tile address, `0..grid_size²`.
pub type TileIndex = u16;

/// Count type used for tile totals and reveal counts.
pub type TileCount = u16;

/// Simulated currency amount.
pub type Amount = f64;

/// Payout multiplier applied to the bet.
pub type Multiplier = f64;

/// Smallest grid that still has a tile to reveal besides the last one.
pub const MIN_GRID_SIZE: GridSize = 2;

pub const fn total_tiles(grid_size: GridSize) -> TileCount {
    let side = grid_size as TileCount;
    side.saturating_mul(side)
}

/// Whether `amount` is a usable, finite, non-negative currency value.
pub fn is_valid_amount(amount: Amount) -> bool {
    amount.is_finite() && amount >= 0.0
}
