//! Turn-by-turn match resolution.
//!
//! The engine holds at most one pending first selection. A second selection
//! resolves the turn immediately: both cards are locked, the outcome is
//! published on the outbox, and a timed transition is scheduled that either
//! hides the pair or turns it face down again. The selection is cleared as
//! soon as the turn resolves, so the player may start the next turn while the
//! previous transition is still in flight.

use std::time::Duration;

use tracing::{debug, trace};

use crate::card::CardFace;
use crate::schedule::Scheduler;

/// Default wait between resolving a turn and hiding/flipping its cards.
pub const FLIP_BACK_DELAY: Duration = Duration::from_millis(400);

/// Outcome notifications for whoever owns the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    MatchFound,
    Mismatch,
    AllPairsCompleted,
}

/// Audio/visual cues for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    CardFlip,
    Match,
    Mismatch,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneSelected,
    Resolving,
    Completed,
}

/// What a call to [`MatchEngine::select_card`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing changed: the card is already held, locked, or off the board.
    Ignored,
    /// The card became the first selection of the turn.
    Held,
    Matched,
    Mismatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Hide(usize, usize),
    FlipBack(usize, usize),
}

#[derive(Debug)]
pub struct MatchEngine {
    first: Option<usize>,
    second: Option<usize>,
    total_pairs: usize,
    matched_pairs: usize,
    flip_back_delay: Duration,
    transitions: Scheduler<Transition>,
    events: Vec<MatchEvent>,
    cues: Vec<Cue>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(FLIP_BACK_DELAY)
    }
}

impl MatchEngine {
    pub fn new(flip_back_delay: Duration) -> Self {
        MatchEngine {
            first: None,
            second: None,
            total_pairs: 0,
            matched_pairs: 0,
            flip_back_delay,
            transitions: Scheduler::new(),
            events: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Reset the pair counters for a board of `total_cards`.
    ///
    /// A pending first selection survives so that a load can restore it
    /// beforehand with [`restore_first_selection`](Self::restore_first_selection).
    pub fn initialize(&mut self, total_cards: usize, already_matched_pairs: usize) {
        debug_assert!(total_cards % 2 == 0, "board must hold an even number of cards");
        self.total_pairs = total_cards / 2;
        self.matched_pairs = already_matched_pairs.min(self.total_pairs);
        self.second = None;
        self.transitions.cancel_all();
        debug!(
            total_pairs = self.total_pairs,
            matched_pairs = self.matched_pairs,
            "Match engine initialized"
        );
    }

    /// Handle a player pick of the card in `slot`.
    ///
    /// Callers are expected to stop routing input to cards that are not
    /// interactable; locked cards are ignored here as well.
    pub fn select_card<C: CardFace>(&mut self, cards: &mut [C], slot: usize) -> Selection {
        if self.first == Some(slot) {
            return Selection::Ignored;
        }
        let Some(card) = cards.get_mut(slot) else {
            debug!(slot, "Selection outside the board ignored");
            return Selection::Ignored;
        };
        if !card.is_interactable() {
            trace!(slot, "Selection of a locked card ignored");
            return Selection::Ignored;
        }

        card.show_front(true);
        self.cues.push(Cue::CardFlip);

        let Some(first) = self.first else {
            self.first = Some(slot);
            return Selection::Held;
        };

        self.second = Some(slot);
        self.check_match(cards, first, slot)
    }

    fn check_match<C: CardFace>(&mut self, cards: &mut [C], first: usize, second: usize) -> Selection {
        cards[first].disable();
        cards[second].disable();

        if cards[first].identity() == cards[second].identity() {
            self.matched_pairs += 1;
            self.events.push(MatchEvent::MatchFound);
            self.cues.push(Cue::Match);

            cards[first].show_match_feedback();
            cards[second].show_match_feedback();
            self.clear_selection();
            self.transitions
                .schedule(self.flip_back_delay, Transition::Hide(first, second));

            debug!(first, second, matched = self.matched_pairs, "Pair matched");
            if self.matched_pairs >= self.total_pairs {
                self.events.push(MatchEvent::AllPairsCompleted);
            }
            Selection::Matched
        } else {
            self.cues.push(Cue::Mismatch);
            self.events.push(MatchEvent::Mismatch);

            cards[first].show_mismatch_feedback();
            cards[second].show_mismatch_feedback();
            self.clear_selection();
            self.transitions
                .schedule(self.flip_back_delay, Transition::FlipBack(first, second));

            debug!(first, second, "Pair mismatched");
            Selection::Mismatched
        }
    }

    fn clear_selection(&mut self) {
        self.first = None;
        self.second = None;
    }

    /// Advance the transition clock by real elapsed time and apply whatever
    /// became due. Returns the number of transitions applied.
    pub fn advance<C: CardFace>(&mut self, cards: &mut [C], elapsed: Duration) -> usize {
        let due = self.transitions.advance(elapsed);
        let mut applied = 0;
        for transition in due {
            let (a, b) = match transition {
                Transition::Hide(a, b) | Transition::FlipBack(a, b) => (a, b),
            };
            // The board may have been rebuilt smaller since scheduling.
            if a >= cards.len() || b >= cards.len() {
                debug!(?transition, "Dropping transition for a vanished slot");
                continue;
            }
            match transition {
                Transition::Hide(..) => {
                    cards[a].hide();
                    cards[b].hide();
                }
                Transition::FlipBack(..) => {
                    cards[a].show_back();
                    cards[b].show_back();
                    cards[a].enable();
                    cards[b].enable();
                }
            }
            applied += 1;
        }
        applied
    }

    /// Reinstate a first selection from a save, without reveal or cue.
    pub fn restore_first_selection(&mut self, slot: usize) {
        self.first = Some(slot);
    }

    /// Drop every in-flight transition. Used on teardown.
    pub fn cancel_pending(&mut self) -> usize {
        self.transitions.cancel_all()
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn phase(&self) -> Phase {
        if self.total_pairs > 0 && self.matched_pairs >= self.total_pairs {
            Phase::Completed
        } else if self.first.is_some() {
            Phase::OneSelected
        } else if self.is_resolving() {
            Phase::Resolving
        } else {
            Phase::Idle
        }
    }

    pub fn pending_first(&self) -> Option<usize> {
        self.first
    }

    pub fn is_resolving(&self) -> bool {
        !self.transitions.is_idle()
    }

    /// Time until the next transition is due, if any is in flight.
    pub fn next_transition_in(&self) -> Option<Duration> {
        self.transitions.next_due_in()
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn flip_back_delay(&self) -> Duration {
        self.flip_back_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardState;

    fn board(ids: &[&str]) -> Vec<CardState> {
        ids.iter()
            .map(|id| CardState::with_identity((*id).into()))
            .collect()
    }

    fn engine_for(cards: &[CardState]) -> MatchEngine {
        let mut engine = MatchEngine::default();
        engine.initialize(cards.len(), 0);
        engine
    }

    #[test]
    fn first_pick_is_held_face_up() {
        let mut cards = board(&["a", "b", "a", "b"]);
        let mut engine = engine_for(&cards);

        assert_eq!(engine.select_card(&mut cards, 0), Selection::Held);
        assert_eq!(engine.phase(), Phase::OneSelected);
        assert_eq!(engine.pending_first(), Some(0));
        assert!(cards[0].is_face_up());
        assert!(cards[0].is_flipped_by_player());
        assert_eq!(engine.drain_cues(), vec![Cue::CardFlip]);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn reclicking_the_held_card_is_a_noop() {
        let mut cards = board(&["a", "b", "a", "b"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        engine.drain_cues();
        assert_eq!(engine.select_card(&mut cards, 0), Selection::Ignored);
        assert_eq!(engine.pending_first(), Some(0));
        assert!(cards[0].is_face_up());
        assert!(engine.drain_cues().is_empty());
    }

    #[test]
    fn matching_pair_is_locked_then_hidden() {
        let mut cards = board(&["a", "b", "a", "b"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        assert_eq!(engine.select_card(&mut cards, 2), Selection::Matched);

        assert_eq!(engine.drain_events(), vec![MatchEvent::MatchFound]);
        assert_eq!(
            engine.drain_cues(),
            vec![Cue::CardFlip, Cue::CardFlip, Cue::Match]
        );
        assert_eq!(engine.matched_pairs(), 1);
        assert!(cards[0].is_matched() && cards[2].is_matched());
        assert!(!cards[0].is_interactable() && !cards[2].is_interactable());
        assert!(!cards[0].is_hidden());
        assert_eq!(engine.pending_first(), None);
        assert_eq!(engine.phase(), Phase::Resolving);

        assert_eq!(engine.advance(&mut cards, FLIP_BACK_DELAY / 2), 0);
        assert!(!cards[0].is_hidden());
        assert_eq!(engine.advance(&mut cards, FLIP_BACK_DELAY / 2), 1);
        assert!(cards[0].is_hidden() && cards[2].is_hidden());
        assert!(!cards[0].is_interactable());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn mismatched_pair_turns_back_over() {
        let mut cards = board(&["a", "b", "a", "b"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        assert_eq!(engine.select_card(&mut cards, 1), Selection::Mismatched);

        assert_eq!(engine.drain_events(), vec![MatchEvent::Mismatch]);
        assert_eq!(engine.matched_pairs(), 0);
        assert!(!cards[0].is_interactable() && !cards[1].is_interactable());
        assert!(cards[0].is_face_up());

        engine.advance(&mut cards, FLIP_BACK_DELAY);
        for card in &cards[..2] {
            assert!(!card.is_face_up());
            assert!(card.is_interactable());
            assert!(!card.is_matched());
        }
        assert!(!engine.is_resolving());
    }

    #[test]
    fn completion_fires_once_after_last_pair() {
        let mut cards = board(&["a", "a", "b", "b"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        engine.select_card(&mut cards, 1);
        assert_eq!(engine.drain_events(), vec![MatchEvent::MatchFound]);
        assert_ne!(engine.phase(), Phase::Completed);

        engine.select_card(&mut cards, 2);
        engine.select_card(&mut cards, 3);
        assert_eq!(
            engine.drain_events(),
            vec![MatchEvent::MatchFound, MatchEvent::AllPairsCompleted]
        );
        assert_eq!(engine.phase(), Phase::Completed);

        engine.advance(&mut cards, FLIP_BACK_DELAY);
        assert!(cards.iter().all(|c| c.is_hidden()));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn next_turn_can_start_while_previous_resolves() {
        let mut cards = board(&["a", "b", "c", "a", "b", "c"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        engine.select_card(&mut cards, 1);
        assert!(engine.is_resolving());

        // Locked cards of the resolving pair are ignored.
        assert_eq!(engine.select_card(&mut cards, 1), Selection::Ignored);
        assert_eq!(engine.select_card(&mut cards, 2), Selection::Held);

        engine.advance(&mut cards, FLIP_BACK_DELAY);
        assert!(!cards[0].is_face_up() && !cards[1].is_face_up());
        assert!(cards[2].is_face_up(), "new selection is untouched by the flip-back");
        assert_eq!(engine.pending_first(), Some(2));

        assert_eq!(engine.select_card(&mut cards, 5), Selection::Matched);
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut cards = board(&["a", "a"]);
        let mut engine = engine_for(&cards);
        assert_eq!(engine.select_card(&mut cards, 7), Selection::Ignored);
        assert!(engine.drain_cues().is_empty());
    }

    #[test]
    fn initialize_keeps_restored_first_selection() {
        let mut cards = board(&["a", "b", "a", "b"]);
        let mut engine = MatchEngine::default();

        cards[1].show_front(true);
        engine.restore_first_selection(1);
        engine.initialize(cards.len(), 1);
        assert!(engine.drain_cues().is_empty());

        assert_eq!(engine.pending_first(), Some(1));
        assert_eq!(engine.matched_pairs(), 1);
        assert_eq!(engine.select_card(&mut cards, 3), Selection::Matched);
        assert_eq!(
            engine.drain_events(),
            vec![MatchEvent::MatchFound, MatchEvent::AllPairsCompleted]
        );
    }

    #[test]
    fn cancelled_transitions_leave_cards_alone() {
        let mut cards = board(&["a", "b"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 0);
        engine.select_card(&mut cards, 1);
        assert_eq!(engine.cancel_pending(), 1);

        assert_eq!(engine.advance(&mut cards, FLIP_BACK_DELAY * 2), 0);
        assert!(cards[0].is_face_up());
        assert!(!engine.is_resolving());
    }

    #[test]
    fn transitions_for_vanished_slots_are_dropped() {
        let mut cards = board(&["a", "b", "c", "d"]);
        let mut engine = engine_for(&cards);

        engine.select_card(&mut cards, 2);
        engine.select_card(&mut cards, 3);
        cards.truncate(2);
        assert_eq!(engine.advance(&mut cards, FLIP_BACK_DELAY), 0);
    }
}
