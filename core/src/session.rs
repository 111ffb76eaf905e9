use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const DEFAULT_BALANCE: Amount = 1000.0;
pub const DEFAULT_BET: Amount = 10.0;
pub const DEFAULT_MINE_COUNT: u8 = 5;
pub const DEFAULT_GRID_SIZE: GridSize = 5;
pub const DEFAULT_USERNAME: &str = "Player";

/// Quick-pick bet amounts offered by front ends.
pub const BET_PRESETS: [Amount; 5] = [5.0, 10.0, 25.0, 50.0, 100.0];

/// Quick-pick mine counts offered by front ends.
pub const MINE_PRESETS: [u8; 6] = [1, 3, 5, 10, 15, 20];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    #[default]
    Idle,
    Active,
    Won,
    Lost,
}

impl RoundState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Complete player session, persisted as a flat record after every change.
///
/// `mine_count` is kept for display and history only: every round has
/// exactly one effective mine, the tile that ended it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub balance: Amount,
    pub bet_amount: Amount,
    pub mine_count: u8,
    pub grid_size: GridSize,
    pub state: RoundState,
    /// Reveal order matters for the multiplier progression.
    pub revealed_tiles: Vec<TileIndex>,
    pub mines: Vec<TileIndex>,
    pub current_multiplier: Multiplier,
    pub history: History,
    pub username: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            bet_amount: DEFAULT_BET,
            mine_count: DEFAULT_MINE_COUNT,
            grid_size: DEFAULT_GRID_SIZE,
            state: RoundState::Idle,
            revealed_tiles: Vec::new(),
            mines: Vec::new(),
            current_multiplier: multiplier::BASE_MULTIPLIER,
            history: History::new(),
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

impl Session {
    pub fn total_tiles(&self) -> TileCount {
        total_tiles(self.grid_size)
    }

    pub fn revealed_count(&self) -> TileCount {
        TileCount::try_from(self.revealed_tiles.len()).unwrap_or(TileCount::MAX)
    }

    pub fn remaining_tiles(&self) -> TileCount {
        self.total_tiles().saturating_sub(self.revealed_count())
    }

    pub fn is_revealed(&self, tile: TileIndex) -> bool {
        self.revealed_tiles.contains(&tile)
    }

    pub fn is_mine(&self, tile: TileIndex) -> bool {
        self.mines.contains(&tile)
    }

    pub fn validate_tile(&self, tile: TileIndex) -> Result<TileIndex> {
        let total = self.total_tiles();
        if tile < total {
            Ok(tile)
        } else {
            Err(GameError::InvalidTile { tile, total })
        }
    }

    /// Checks the invariants a loaded session must satisfy.
    pub fn validate(&self) -> core::result::Result<(), PersistError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(PersistError::Corrupt("grid size below minimum"));
        }
        if !is_valid_amount(self.balance) {
            return Err(PersistError::Corrupt("invalid balance"));
        }
        if !is_valid_amount(self.bet_amount) || self.bet_amount == 0.0 {
            return Err(PersistError::Corrupt("invalid bet amount"));
        }
        if !self.current_multiplier.is_finite()
            || self.current_multiplier < multiplier::BASE_MULTIPLIER
            || self.current_multiplier > multiplier::MAX_MULTIPLIER
        {
            return Err(PersistError::Corrupt("multiplier out of range"));
        }

        let total = self.total_tiles();
        let in_grid = |tile: &TileIndex| *tile < total;
        if !self.revealed_tiles.iter().all(in_grid) || !self.mines.iter().all(in_grid) {
            return Err(PersistError::Corrupt("tile outside of the grid"));
        }
        let has_duplicates = self
            .revealed_tiles
            .iter()
            .enumerate()
            .any(|(i, tile)| self.revealed_tiles[..i].contains(tile));
        if has_duplicates {
            return Err(PersistError::Corrupt("tile revealed twice"));
        }

        match self.state {
            RoundState::Active => {
                if self.revealed_count() >= total - 1 {
                    return Err(PersistError::Corrupt("active round with no tiles left"));
                }
                if !self.mines.is_empty() {
                    return Err(PersistError::Corrupt("mines shown during an active round"));
                }
                if self.current_multiplier
                    != multiplier::multiplier_for(self.revealed_count(), self.grid_size)
                {
                    return Err(PersistError::Corrupt("multiplier does not match reveals"));
                }
            }
            RoundState::Lost => {
                if self.mines.len() != 1 {
                    return Err(PersistError::Corrupt("lost round without a mine"));
                }
            }
            // cashing out early leaves the mine undisclosed
            RoundState::Won => {
                if self.mines.len() > 1 {
                    return Err(PersistError::Corrupt("more than one mine"));
                }
            }
            RoundState::Idle => {
                if !self.mines.is_empty() {
                    return Err(PersistError::Corrupt("mines shown before a round"));
                }
            }
        }
        if self.mines.iter().any(|mine| self.is_revealed(*mine)) {
            return Err(PersistError::Corrupt("mine tile also revealed"));
        }

        if !self.history.is_consistent() {
            return Err(PersistError::Corrupt("history ids out of sequence"));
        }

        Ok(())
    }
}
