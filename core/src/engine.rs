use alloc::string::String;

use crate::*;

/// What an engine operation did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    NoChange,
    Started,
    Revealed { multiplier: Multiplier },
    Won(RoundRecord),
    Lost(RoundRecord),
    Configured,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Ledger entry appended by this action, if it resolved a round.
    pub const fn record(self) -> Option<RoundRecord> {
        match self {
            Self::Won(record) | Self::Lost(record) => Some(record),
            _ => None,
        }
    }
}

/// Owns the player session and drives it through rounds.
///
/// Every operation runs to completion synchronously. Precondition violations
/// inside the grid are silent no-ops reported as [`ActionOutcome::NoChange`];
/// only a missing balance, out-of-grid tiles and invalid configuration
/// values are errors. The session is saved after every change.
#[derive(Debug)]
pub struct GameEngine<P, N> {
    session: Session,
    store: P,
    notifier: N,
}

impl<P: Persistence, N: AudioNotifier> GameEngine<P, N> {
    /// Restores the saved session, falling back to defaults when there is none
    /// or it cannot be read.
    pub fn open(mut store: P, notifier: N) -> Self {
        let session = match store.load() {
            Ok(Some(session)) => {
                log::debug!(
                    "restored session: balance {}, {} rounds",
                    session.balance,
                    session.history.len()
                );
                session
            }
            Ok(None) => {
                log::debug!("no saved session, starting fresh");
                Session::default()
            }
            Err(err) => {
                log::warn!("could not load saved session, starting fresh: {}", err);
                Session::default()
            }
        };
        Self::with_session(session, store, notifier)
    }

    pub fn with_session(session: Session, store: P, notifier: N) -> Self {
        Self {
            session,
            store,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> GameView {
        GameView::from_session(&self.session)
    }

    pub fn stats(&self) -> HistoryStats {
        self.session.history.stats()
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_parts(self) -> (Session, P, N) {
        (self.session, self.store, self.notifier)
    }

    /// Debits the bet and opens a fresh round.
    pub fn start(&mut self) -> Result<ActionOutcome> {
        let session = &mut self.session;
        if session.state.is_playing() {
            log::trace!("start ignored, round in progress");
            return Ok(ActionOutcome::NoChange);
        }
        if session.balance < session.bet_amount {
            return Err(GameError::InsufficientBalance {
                balance: session.balance,
                bet: session.bet_amount,
            });
        }

        session.balance -= session.bet_amount;
        session.revealed_tiles.clear();
        session.mines.clear();
        session.current_multiplier = multiplier::BASE_MULTIPLIER;
        session.state = RoundState::Active;
        log::debug!(
            "round started: bet {}, balance {}",
            session.bet_amount,
            session.balance
        );

        self.persist();
        Ok(ActionOutcome::Started)
    }

    /// Opens a safe tile. Clearing all tiles but one wins the round outright.
    pub fn reveal(&mut self, tile: TileIndex) -> Result<ActionOutcome> {
        let tile = self.session.validate_tile(tile)?;
        if !self.can_act_on(tile) {
            log::trace!("reveal {} ignored", tile);
            return Ok(ActionOutcome::NoChange);
        }

        let session = &mut self.session;
        session.revealed_tiles.push(tile);
        session.current_multiplier =
            multiplier::multiplier_for(session.revealed_count(), session.grid_size);
        let multiplier = session.current_multiplier;
        log::debug!(
            "revealed {}: {} tiles, multiplier {}",
            tile,
            session.revealed_count(),
            multiplier
        );
        self.emit(Notification::TileRevealed);

        if self.session.remaining_tiles() == 1 {
            return Ok(self.clear_board(multiplier));
        }

        self.persist();
        Ok(ActionOutcome::Revealed { multiplier })
    }

    /// Declares `tile` the mine, which ends the round as a loss. There is no
    /// hidden layout: whichever tile the player picks is the mine.
    pub fn resolve_mine(&mut self, tile: TileIndex) -> Result<ActionOutcome> {
        let tile = self.session.validate_tile(tile)?;
        if !self.can_act_on(tile) {
            log::trace!("mine at {} ignored", tile);
            return Ok(ActionOutcome::NoChange);
        }

        let session = &mut self.session;
        let revealed = session.revealed_count();
        session.mines.clear();
        session.mines.push(tile);
        session.state = RoundState::Lost;
        let record = session
            .history
            .record_loss(session.bet_amount, session.mine_count, revealed);
        log::debug!("mine hit at {}, round {} lost", tile, record.id);
        self.emit(Notification::MineHit);

        self.persist();
        Ok(ActionOutcome::Lost(record))
    }

    /// Cashes out at the current multiplier.
    pub fn cashout(&mut self) -> ActionOutcome {
        let multiplier = self.session.current_multiplier;
        self.settle_win(multiplier)
    }

    /// Cashes out at an explicit multiplier.
    pub fn cashout_at(&mut self, multiplier: Multiplier) -> Result<ActionOutcome> {
        if !self.session.state.is_playing() {
            log::trace!("cashout ignored, no round in progress");
            return Ok(ActionOutcome::NoChange);
        }
        if !(multiplier::BASE_MULTIPLIER..=multiplier::MAX_MULTIPLIER).contains(&multiplier) {
            return Err(GameError::InvalidMultiplier(multiplier));
        }
        Ok(self.settle_win(multiplier))
    }

    pub fn set_bet_amount(&mut self, amount: Amount) -> Result<ActionOutcome> {
        if self.session.state.is_playing() {
            log::trace!("configuration locked during a round");
            return Ok(ActionOutcome::NoChange);
        }
        if !is_valid_amount(amount) || amount == 0.0 {
            return Err(GameError::InvalidAmount);
        }
        Ok(self.configure(|session| {
            let changed = session.bet_amount != amount;
            session.bet_amount = amount;
            changed
        }))
    }

    /// Stored for display and history only.
    pub fn set_mine_count(&mut self, count: u8) -> ActionOutcome {
        self.configure(|session| {
            let changed = session.mine_count != count;
            session.mine_count = count;
            changed
        })
    }

    /// Overrides the simulated balance between rounds.
    pub fn set_balance(&mut self, amount: Amount) -> Result<ActionOutcome> {
        if !is_valid_amount(amount) {
            return Err(GameError::InvalidAmount);
        }
        Ok(self.configure(|session| {
            let changed = session.balance != amount;
            session.balance = amount;
            changed
        }))
    }

    /// Resizes the grid between rounds. A resolved board is cleared since its
    /// tile indices no longer apply.
    pub fn set_grid_size(&mut self, grid_size: GridSize) -> Result<ActionOutcome> {
        if grid_size < MIN_GRID_SIZE {
            return Err(GameError::InvalidGridSize(grid_size));
        }
        Ok(self.configure(|session| {
            if session.grid_size == grid_size {
                return false;
            }
            session.grid_size = grid_size;
            session.revealed_tiles.clear();
            session.mines.clear();
            session.current_multiplier = multiplier::BASE_MULTIPLIER;
            session.state = RoundState::Idle;
            true
        }))
    }

    /// Display label only, can change at any time.
    pub fn set_username(&mut self, username: impl Into<String>) -> ActionOutcome {
        let username = username.into();
        if self.session.username == username {
            return ActionOutcome::NoChange;
        }
        self.session.username = username;
        self.persist();
        ActionOutcome::Configured
    }

    fn can_act_on(&self, tile: TileIndex) -> bool {
        self.session.state.is_playing() && !self.session.is_revealed(tile)
    }

    /// Auto-win once a single tile is left: that tile becomes the mine and
    /// the round is cashed out at the final multiplier.
    fn clear_board(&mut self, multiplier: Multiplier) -> ActionOutcome {
        let total = self.session.total_tiles();
        let leftover = (0..total).find(|&tile| !self.session.is_revealed(tile));
        if let Some(leftover) = leftover {
            self.session.mines.clear();
            self.session.mines.push(leftover);
        }
        log::debug!("board cleared, mine was at {:?}", leftover);
        self.settle_win(multiplier)
    }

    fn settle_win(&mut self, multiplier: Multiplier) -> ActionOutcome {
        let session = &mut self.session;
        if !session.state.is_playing() {
            log::trace!("cashout ignored, no round in progress");
            return ActionOutcome::NoChange;
        }

        let revealed = session.revealed_count();
        let win_amount = multiplier::payout(session.bet_amount, multiplier);
        session.balance += win_amount;
        session.state = RoundState::Won;
        let record = session.history.record_win(
            session.bet_amount,
            session.mine_count,
            multiplier,
            revealed,
        );
        log::debug!(
            "round {} won: {}x, credited {}, balance {}",
            record.id,
            multiplier,
            win_amount,
            session.balance
        );
        self.emit(Notification::RoundWon);

        self.persist();
        ActionOutcome::Won(record)
    }

    fn configure(&mut self, apply: impl FnOnce(&mut Session) -> bool) -> ActionOutcome {
        if self.session.state.is_playing() {
            log::trace!("configuration locked during a round");
            return ActionOutcome::NoChange;
        }
        if !apply(&mut self.session) {
            return ActionOutcome::NoChange;
        }
        self.persist();
        ActionOutcome::Configured
    }

    fn emit(&mut self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification) {
            log::warn!("could not play {}: {}", notification, err);
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.session) {
            log::error!("could not save session: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct Recorder(Vec<Notification>);

    impl AudioNotifier for Recorder {
        fn notify(&mut self, notification: Notification) -> core::result::Result<(), NotifyError> {
            self.0.push(notification);
            Ok(())
        }
    }

    struct BrokenSpeaker;

    impl AudioNotifier for BrokenSpeaker {
        fn notify(&mut self, _: Notification) -> core::result::Result<(), NotifyError> {
            Err(NotifyError::Unavailable)
        }
    }

    struct ReadOnlyStore;

    impl Persistence for ReadOnlyStore {
        fn load(&mut self) -> core::result::Result<Option<Session>, PersistError> {
            Err(PersistError::Io("denied".into()))
        }

        fn save(&mut self, _: &Session) -> core::result::Result<(), PersistError> {
            Err(PersistError::Io("denied".into()))
        }
    }

    fn engine() -> GameEngine<MemoryStore, Recorder> {
        GameEngine::open(MemoryStore::new(), Recorder::default())
    }

    #[test]
    fn start_debits_bet_and_opens_round() {
        let mut engine = engine();

        assert_eq!(engine.start(), Ok(ActionOutcome::Started));

        let session = engine.session();
        assert_eq!(session.balance, 990.0);
        assert!(session.state.is_playing());
        assert!(session.revealed_tiles.is_empty());
        assert_eq!(session.current_multiplier, 1.0);
        assert!(session.history.is_empty());
    }

    #[test]
    fn start_twice_does_not_debit_again() {
        let mut engine = engine();

        engine.start().unwrap();
        assert_eq!(engine.start(), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.session().balance, 990.0);
    }

    #[test]
    fn start_without_enough_balance_fails_unchanged() {
        let mut session = Session::default();
        session.balance = 5.0;
        let mut engine = GameEngine::with_session(session.clone(), MemoryStore::new(), NoSound);

        assert_eq!(
            engine.start(),
            Err(GameError::InsufficientBalance {
                balance: 5.0,
                bet: 10.0
            })
        );
        assert_eq!(engine.session(), &session);
        assert_eq!(engine.store().saves(), 0);
    }

    #[test]
    fn reveal_grows_multiplier_and_notifies() {
        let mut engine = engine();
        engine.start().unwrap();

        for tile in 0..12 {
            assert!(engine.reveal(tile).unwrap().has_update());
        }

        assert_eq!(engine.session().current_multiplier, 4.0);
        assert_eq!(engine.notifier().0.len(), 12);
        assert!(
            engine
                .notifier()
                .0
                .iter()
                .all(|&n| n == Notification::TileRevealed)
        );
    }

    #[test]
    fn reveal_is_a_no_op_when_repeated_or_idle() {
        let mut engine = engine();
        assert_eq!(engine.reveal(3), Ok(ActionOutcome::NoChange));

        engine.start().unwrap();
        engine.reveal(3).unwrap();
        let before = engine.session().clone();

        assert_eq!(engine.reveal(3), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.session(), &before);
        assert_eq!(engine.notifier().0, [Notification::TileRevealed]);
    }

    #[test]
    fn reveal_outside_grid_is_an_error() {
        let mut engine = engine();
        engine.start().unwrap();

        assert_eq!(
            engine.reveal(25),
            Err(GameError::InvalidTile { tile: 25, total: 25 })
        );
    }

    #[test]
    fn resolve_mine_loses_without_further_debit() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.reveal(0).unwrap();
        engine.reveal(1).unwrap();

        let outcome = engine.resolve_mine(7).unwrap();

        let record = outcome.record().unwrap();
        assert!(matches!(outcome, ActionOutcome::Lost(_)));
        assert_eq!(record.profit, -10.0);
        assert_eq!(record.multiplier, 0.0);
        assert_eq!(record.tiles_revealed, 2);
        let session = engine.session();
        assert_eq!(session.balance, 990.0);
        assert_eq!(session.mines, [7]);
        assert_eq!(session.state, RoundState::Lost);
        assert!(!engine.view().won);
        assert_eq!(engine.notifier().0.last(), Some(&Notification::MineHit));
    }

    #[test]
    fn resolve_mine_on_revealed_tile_is_ignored() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.reveal(4).unwrap();

        assert_eq!(engine.resolve_mine(4), Ok(ActionOutcome::NoChange));
        assert!(engine.session().state.is_playing());
    }

    #[test]
    fn cashout_credits_bet_times_multiplier() {
        let mut engine = engine();
        engine.start().unwrap();
        for tile in 0..12 {
            engine.reveal(tile).unwrap();
        }

        let outcome = engine.cashout();

        let record = outcome.record().unwrap();
        assert_eq!(record.profit, 30.0);
        assert_eq!(record.multiplier, 4.0);
        assert_eq!(record.tiles_revealed, 12);
        assert_eq!(engine.session().balance, 1030.0);
        assert!(engine.session().mines.is_empty());
        assert!(engine.view().won);
        assert_eq!(engine.cashout(), ActionOutcome::NoChange);
        assert_eq!(engine.session().history.len(), 1);
    }

    #[test]
    fn cashout_at_rejects_out_of_range_multiplier() {
        let mut engine = engine();
        engine.start().unwrap();

        assert_eq!(
            engine.cashout_at(30.0),
            Err(GameError::InvalidMultiplier(30.0))
        );
        assert!(engine.session().state.is_playing());
        assert_eq!(engine.cashout_at(2.5).unwrap().record().unwrap().profit, 15.0);
    }

    #[test]
    fn cashout_at_without_round_is_ignored() {
        let mut engine = engine();

        assert_eq!(engine.cashout_at(30.0), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.cashout_at(2.0), Ok(ActionOutcome::NoChange));
        assert!(engine.session().history.is_empty());
    }

    #[test]
    fn clearing_all_but_one_tile_wins_once() {
        let mut engine = engine();
        engine.start().unwrap();
        for tile in 0..23 {
            engine.reveal(tile).unwrap();
        }

        let outcome = engine.reveal(24).unwrap();

        let record = outcome.record().unwrap();
        assert!(record.is_win());
        assert_eq!(record.multiplier, 25.0);
        assert_eq!(record.tiles_revealed, 24);
        assert_eq!(engine.session().mines, [23]);
        assert_eq!(engine.session().balance, 990.0 + 250.0);
        assert_eq!(engine.session().history.len(), 1);
        let wins = engine
            .notifier()
            .0
            .iter()
            .filter(|&&n| n == Notification::RoundWon)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(engine.notifier().0.last(), Some(&Notification::RoundWon));
    }

    #[test]
    fn configuration_is_locked_mid_round() {
        let mut engine = engine();
        engine.start().unwrap();

        assert_eq!(engine.set_bet_amount(50.0), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.set_bet_amount(0.0), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.set_mine_count(3), ActionOutcome::NoChange);
        assert_eq!(engine.set_balance(5.0), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.set_grid_size(6), Ok(ActionOutcome::NoChange));
        assert_eq!(engine.session().bet_amount, 10.0);
        assert_eq!(engine.session().mine_count, 5);

        engine.cashout();
        assert_eq!(engine.set_bet_amount(50.0), Ok(ActionOutcome::Configured));
        assert_eq!(engine.set_mine_count(3), ActionOutcome::Configured);
        assert_eq!(engine.session().bet_amount, 50.0);
    }

    #[test]
    fn configuration_rejects_invalid_values() {
        let mut engine = engine();

        assert_eq!(engine.set_bet_amount(0.0), Err(GameError::InvalidAmount));
        assert_eq!(engine.set_bet_amount(f64::NAN), Err(GameError::InvalidAmount));
        assert_eq!(engine.set_balance(-1.0), Err(GameError::InvalidAmount));
        assert_eq!(engine.set_grid_size(1), Err(GameError::InvalidGridSize(1)));
    }

    #[test]
    fn grid_resize_clears_resolved_board() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.reveal(2).unwrap();
        engine.resolve_mine(9).unwrap();

        assert_eq!(engine.set_grid_size(3), Ok(ActionOutcome::Configured));

        let session = engine.session();
        assert_eq!(session.total_tiles(), 9);
        assert_eq!(session.state, RoundState::Idle);
        assert!(session.mines.is_empty() && session.revealed_tiles.is_empty());
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn username_changes_any_time() {
        let mut engine = engine();
        engine.start().unwrap();

        assert_eq!(engine.set_username("ada"), ActionOutcome::Configured);
        assert_eq!(engine.set_username("ada"), ActionOutcome::NoChange);
        assert_eq!(engine.view().username, "ada");
    }

    #[test]
    fn every_change_is_saved_and_reloadable() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.reveal(5).unwrap();
        engine.reveal(6).unwrap();
        assert_eq!(engine.store().saves(), 3);

        let (session, store, _) = engine.into_parts();
        let reopened = GameEngine::open(store, NoSound);
        assert_eq!(reopened.session(), &session);
    }

    #[test]
    fn collaborator_failures_do_not_affect_state() {
        let mut engine = GameEngine::open(ReadOnlyStore, BrokenSpeaker);
        assert_eq!(engine.session(), &Session::default());

        engine.start().unwrap();
        engine.reveal(0).unwrap();
        let outcome = engine.resolve_mine(1).unwrap();

        assert!(matches!(outcome, ActionOutcome::Lost(_)));
        assert_eq!(engine.session().balance, 990.0);
    }

    #[test]
    fn corrupt_saved_state_falls_back_to_defaults() {
        let engine = GameEngine::open(MemoryStore::with_blob("{\"gridSize\": 0}"), NoSound);

        assert_eq!(engine.session(), &Session::default());
    }
}
