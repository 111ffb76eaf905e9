use alloc::string::String;
use alloc::vec::Vec;
use serde::Serialize;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileView {
    Hidden,
    Gem,
    Mine,
}

/// Read-only snapshot handed to the presentation layer after every action.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub balance: Amount,
    pub bet_amount: Amount,
    pub mine_count: u8,
    pub grid_size: GridSize,
    pub is_playing: bool,
    pub revealed_tiles: Vec<TileIndex>,
    /// Empty unless the round is resolved.
    pub mines: Vec<TileIndex>,
    pub current_multiplier: Multiplier,
    pub game_over: bool,
    pub won: bool,
    pub history: Vec<RoundRecord>,
    pub username: String,
    pub remaining_tiles: TileCount,
    /// Multiplier after one more safe reveal, while playing.
    pub next_multiplier: Option<Multiplier>,
    /// What cashing out right now would credit, zero when not playing.
    pub potential_win: Amount,
}

impl GameView {
    pub fn from_session(session: &Session) -> Self {
        let is_playing = session.state.is_playing();
        let game_over = session.state.is_finished();
        let next_multiplier = is_playing.then(|| {
            multiplier::multiplier_for(session.revealed_count() + 1, session.grid_size)
        });
        let potential_win = if is_playing {
            multiplier::payout(session.bet_amount, session.current_multiplier)
        } else {
            0.0
        };

        Self {
            balance: session.balance,
            bet_amount: session.bet_amount,
            mine_count: session.mine_count,
            grid_size: session.grid_size,
            is_playing,
            revealed_tiles: session.revealed_tiles.clone(),
            mines: if game_over {
                session.mines.clone()
            } else {
                Vec::new()
            },
            current_multiplier: session.current_multiplier,
            game_over,
            won: session.state.won(),
            history: session.history.iter().copied().collect(),
            username: session.username.clone(),
            remaining_tiles: session.remaining_tiles(),
            next_multiplier,
            potential_win,
        }
    }

    pub fn total_tiles(&self) -> TileCount {
        total_tiles(self.grid_size)
    }

    pub fn tile_at(&self, tile: TileIndex) -> TileView {
        if self.mines.contains(&tile) {
            TileView::Mine
        } else if self.revealed_tiles.contains(&tile) {
            TileView::Gem
        } else {
            TileView::Hidden
        }
    }

    /// Tiles grouped into rows of `grid_size`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<TileView>> + '_ {
        let side = TileIndex::from(self.grid_size);
        (0..side).map(move |row| (0..side).map(|col| self.tile_at(row * side + col)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn mines_are_hidden_until_resolved() {
        let mut session = Session::default();
        session.state = RoundState::Active;
        session.revealed_tiles = vec![0, 1];
        // never visible during play even if present
        session.mines = vec![7];

        let view = GameView::from_session(&session);
        assert!(view.is_playing);
        assert!(view.mines.is_empty());
        assert_eq!(view.tile_at(7), TileView::Hidden);
        assert_eq!(view.tile_at(1), TileView::Gem);

        session.state = RoundState::Lost;
        let view = GameView::from_session(&session);
        assert!(view.game_over);
        assert!(!view.won);
        assert_eq!(view.mines, [7]);
        assert_eq!(view.tile_at(7), TileView::Mine);
    }

    #[test]
    fn previews_next_multiplier_and_potential_win() {
        let mut session = Session::default();
        session.state = RoundState::Active;
        session.revealed_tiles = (0..11).collect();
        session.current_multiplier = multiplier::multiplier_for(11, 5);

        let view = GameView::from_session(&session);
        assert_eq!(view.next_multiplier, Some(4.0));
        assert_eq!(view.remaining_tiles, 14);
        assert_eq!(view.potential_win, 10.0 * session.current_multiplier);

        let idle = GameView::from_session(&Session::default());
        assert_eq!(idle.next_multiplier, None);
        assert_eq!(idle.potential_win, 0.0);
    }

    #[test]
    fn rows_cover_the_grid() {
        let mut session = Session::default();
        session.grid_size = 3;
        session.state = RoundState::Lost;
        session.revealed_tiles = vec![4];
        session.mines = vec![8];

        let rows: Vec<_> = GameView::from_session(&session).rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], TileView::Gem);
        assert_eq!(rows[2][2], TileView::Mine);
        assert_eq!(rows[0][0], TileView::Hidden);
    }
}
