//! Game session: ties the match engine, suit pool, board and save store
//! together and keeps score.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, instrument, warn};

use crate::board::Board;
use crate::card::{CardFace, CardState, SuitId};
use crate::engine::{Cue, FLIP_BACK_DELAY, MatchEngine, MatchEvent, Selection};
use crate::error::{DealError, LoadError, SaveError};
use crate::pool::SuitPool;
use crate::save::{CardSnapshot, SaveRecord, SaveStore};

/// Parameters handed over by whatever launches a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boot {
    pub new_game: bool,
    pub rows: usize,
    pub columns: usize,
    /// Presentation only; the engine ignores it.
    pub blind: bool,
    pub seed: Option<u64>,
}

impl Default for Boot {
    fn default() -> Self {
        Boot {
            new_game: true,
            rows: 4,
            columns: 4,
            blind: false,
            seed: None,
        }
    }
}

/// Messages for the presentation layer, drained after each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Cue(Cue),
    ScoreChanged { points: u32, turn: u32 },
    GameEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    NoSave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub turn: u32,
    pub points: u32,
    /// Points the next match is worth.
    pub combo: u32,
}

impl Default for Score {
    fn default() -> Self {
        Score {
            turn: 0,
            points: 0,
            combo: 1,
        }
    }
}

impl Score {
    fn on_match(&mut self) {
        self.turn += 1;
        self.points += self.combo;
        self.combo += 1;
    }

    fn on_mismatch(&mut self) {
        self.turn += 1;
        self.combo = 1;
    }
}

pub struct Session<S, C = CardState> {
    pool: SuitPool,
    store: S,
    rng: SmallRng,
    engine: MatchEngine,
    board: Board<C>,
    score: Score,
    notices: Vec<Notice>,
    ended: bool,
}

impl<S: SaveStore> Session<S> {
    /// A session on headless cards with an RNG seeded from OS entropy.
    pub fn new(pool: SuitPool, store: S) -> Self {
        Self::with_rng(pool, store, SmallRng::from_os_rng())
    }

    pub fn seeded(pool: SuitPool, store: S, seed: u64) -> Self {
        Self::with_rng(pool, store, SmallRng::seed_from_u64(seed))
    }
}

impl<S: SaveStore, C: CardFace + Default> Session<S, C> {
    pub fn with_rng(pool: SuitPool, store: S, rng: SmallRng) -> Self {
        Session {
            pool,
            store,
            rng,
            engine: MatchEngine::new(FLIP_BACK_DELAY),
            board: Board::build(0, 0),
            score: Score::default(),
            notices: Vec::new(),
            ended: false,
        }
    }

    /// Change the wait between resolving a turn and hiding/flipping its cards.
    pub fn with_flip_back_delay(mut self, delay: Duration) -> Self {
        self.engine = MatchEngine::new(delay);
        self
    }

    /// Start a new game or resume the saved one, as `boot` asks.
    ///
    /// A requested load that finds nothing usable falls back to a new game.
    #[instrument(skip(self))]
    pub fn boot(&mut self, boot: &Boot) -> Result<LoadOutcome, DealError> {
        if !boot.new_game {
            match self.load_game() {
                Ok(LoadOutcome::Restored) => return Ok(LoadOutcome::Restored),
                Ok(LoadOutcome::NoSave) => info!("No save to resume, dealing a new game"),
                Err(e) => warn!(error = %e, "Save could not be restored, dealing a new game"),
            }
        }
        self.start_new_game(boot.rows, boot.columns)?;
        Ok(LoadOutcome::NoSave)
    }

    /// Deal a fresh random board. On error nothing about the current game
    /// changes.
    #[instrument(skip(self))]
    pub fn start_new_game(&mut self, rows: usize, columns: usize) -> Result<(), DealError> {
        let deal = self.pool.generate_deal(rows * columns, &mut self.rng)?;
        self.begin(rows, columns, deal)
    }

    /// Start a game on a caller-chosen arrangement, e.g. to replay a deal.
    /// Every identity must belong to the pool.
    #[instrument(skip(self, deal))]
    pub fn start_arranged_game(
        &mut self,
        rows: usize,
        columns: usize,
        deal: Vec<SuitId>,
    ) -> Result<(), DealError> {
        if deal.len() % 2 != 0 {
            return Err(DealError::OddCardCount { cards: deal.len() });
        }
        if let Some(id) = deal.iter().find(|id| self.pool.lookup(id).is_err()) {
            return Err(DealError::UnknownSuit { id: id.clone() });
        }
        self.begin(rows, columns, deal)
    }

    fn begin(&mut self, rows: usize, columns: usize, deal: Vec<SuitId>) -> Result<(), DealError> {
        let board = Board::dealt(rows, columns, deal)?;
        let total = board.len();

        self.engine = MatchEngine::new(self.engine.flip_back_delay());
        self.engine.initialize(total, 0);
        self.board = board;
        self.score = Score::default();
        self.ended = false;
        self.notices.clear();
        self.push_score();

        info!(rows, columns, "New game dealt");
        if let Err(e) = self.save_game() {
            warn!(error = %e, "Could not save the new game");
        }
        Ok(())
    }

    /// Route a player pick of `slot` to the engine and apply the outcome.
    pub fn select(&mut self, slot: usize) -> Selection {
        if self.ended {
            return Selection::Ignored;
        }
        let selection = self.engine.select_card(self.board.cards_mut(), slot);
        self.pump();
        selection
    }

    /// Advance timed transitions by real elapsed time.
    pub fn update(&mut self, elapsed: Duration) -> usize {
        self.engine.advance(self.board.cards_mut(), elapsed)
    }

    fn pump(&mut self) {
        for cue in self.engine.drain_cues() {
            self.notices.push(Notice::Cue(cue));
        }
        for event in self.engine.drain_events() {
            match event {
                MatchEvent::Mismatch => {
                    self.score.on_mismatch();
                    self.push_score();
                }
                MatchEvent::MatchFound => {
                    self.score.on_match();
                    self.push_score();
                }
                MatchEvent::AllPairsCompleted => self.finish(),
            }
        }
    }

    fn finish(&mut self) {
        info!(
            turn = self.score.turn,
            points = self.score.points,
            "All pairs found"
        );
        self.ended = true;
        self.notices.push(Notice::Cue(Cue::GameOver));
        self.notices.push(Notice::GameEnded);
        if let Err(e) = self.store.delete() {
            warn!(error = %e, "Could not delete the finished game's save");
        }
    }

    fn push_score(&mut self) {
        self.notices.push(Notice::ScoreChanged {
            points: self.score.points,
            turn: self.score.turn,
        });
    }

    /// Capture the board as it looks right now, mid-turn included.
    pub fn snapshot(&self) -> SaveRecord {
        let pending = self.engine.pending_first();
        let cards = self
            .board
            .cards()
            .iter()
            .enumerate()
            .map(|(slot, card)| CardSnapshot {
                suit_id: card.identity().clone(),
                is_matched: card.is_matched(),
                flipped_by_player: card.is_flipped_by_player(),
                is_pending_first_selection: pending == Some(slot),
            })
            .collect();

        SaveRecord {
            rows: self.board.rows(),
            columns: self.board.columns(),
            cards,
            turn: self.score.turn,
            points: self.score.points,
            combo_multiplier: self.score.combo,
        }
    }

    #[instrument(skip(self))]
    pub fn save_game(&mut self) -> Result<(), SaveError> {
        if self.board.is_empty() || self.ended {
            debug!(ended = self.ended, "No game in progress, skipping save");
            return Ok(());
        }
        let record = self.snapshot();
        self.store.write(&record)
    }

    /// Resume from the store. A missing or structurally broken save is
    /// reported as [`LoadOutcome::NoSave`]; a save naming suits the pool no
    /// longer has is an error. Either way the current game is left untouched
    /// unless the restore succeeds.
    #[instrument(skip(self))]
    pub fn load_game(&mut self) -> Result<LoadOutcome, LoadError> {
        let record = match self.store.read() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(LoadOutcome::NoSave),
            Err(SaveError::Corrupt { source }) => {
                warn!(error = %source, "Ignoring corrupt save");
                return Ok(LoadOutcome::NoSave);
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = record.validate() {
            warn!(error = %e, "Ignoring corrupt save");
            return Ok(LoadOutcome::NoSave);
        }

        let deal = record
            .cards
            .iter()
            .map(|c| self.pool.lookup(&c.suit_id).map(|s| s.id.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut board: Board<C> = Board::build(record.rows, record.columns);
        if let Err(e) = board.deal(deal) {
            warn!(error = %e, "Ignoring corrupt save");
            return Ok(LoadOutcome::NoSave);
        }

        let mut engine = MatchEngine::new(self.engine.flip_back_delay());
        for (slot, (card, state)) in board.cards_mut().iter_mut().zip(&record.cards).enumerate() {
            if state.is_matched {
                if state.flipped_by_player {
                    card.show_front(true);
                }
                card.set_matched();
                card.hide();
            } else if state.is_pending_first_selection {
                card.show_front(true);
                engine.restore_first_selection(slot);
            } else if state.flipped_by_player {
                card.show_front(true);
            } else {
                card.show_back();
            }
        }
        engine.initialize(board.len(), board.matched_count() / 2);

        self.engine = engine;
        self.board = board;
        self.score = Score {
            turn: record.turn,
            points: record.points,
            combo: record.combo_multiplier.max(1),
        };
        self.ended = false;
        self.notices.clear();
        self.push_score();

        info!(
            rows = record.rows,
            columns = record.columns,
            matched_pairs = self.board.matched_count() / 2,
            "Save restored"
        );
        Ok(LoadOutcome::Restored)
    }

    /// Stop the session: in-flight transitions are dropped so nothing fires
    /// against this board afterwards.
    pub fn teardown(&mut self) {
        let cancelled = self.engine.cancel_pending();
        self.notices.clear();
        debug!(cancelled, "Session torn down");
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn board(&self) -> &Board<C> {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn pool(&self) -> &SuitPool {
        &self.pool
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}
