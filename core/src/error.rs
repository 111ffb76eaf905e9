use alloc::string::String;
use thiserror::Error;

use crate::{Amount, GridSize, Multiplier, TileCount, TileIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error("Not enough balance: {balance} available, bet is {bet}")]
    InsufficientBalance { balance: Amount, bet: Amount },
    #[error("Tile {tile} is outside of the grid ({total} tiles)")]
    InvalidTile { tile: TileIndex, total: TileCount },
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Multiplier {0} is out of range")]
    InvalidMultiplier(Multiplier),
    #[error("Grid size {0} is too small")]
    InvalidGridSize(GridSize),
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistError {
    #[error("Could not encode saved state: {0}")]
    Encode(String),
    #[error("Could not decode saved state: {0}")]
    Decode(String),
    #[error("Storage unavailable: {0}")]
    Io(String),
    #[error("Saved state is inconsistent: {0}")]
    Corrupt(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Audio output unavailable")]
    Unavailable,
    #[error("Playback failed: {0}")]
    Playback(String),
}
