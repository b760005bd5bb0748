use std::fmt;

use serde::{Deserialize, Serialize};

/// Key that two cards must share to form a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuitId(String);

impl SuitId {
    pub fn new(id: impl Into<String>) -> Self {
        SuitId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SuitId {
    fn from(id: &str) -> Self {
        SuitId(id.to_string())
    }
}

impl fmt::Display for SuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the suit pool: its identity plus a short symbol for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suit {
    pub id: SuitId,
    pub symbol: String,
}

impl Suit {
    pub fn new(id: &str, symbol: &str) -> Self {
        Suit {
            id: SuitId::from(id),
            symbol: symbol.to_string(),
        }
    }
}

/// Visual feedback most recently applied to a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Match,
    Mismatch,
}

/// Capability interface the match engine drives.
///
/// The engine never sees a concrete presentation type; anything that can be
/// revealed, hidden and locked can sit on the board.
pub trait CardFace {
    fn identity(&self) -> &SuitId;

    /// Assign a fresh identity and return the card to its initial state.
    fn deal(&mut self, identity: SuitId);

    /// Reveal the front. `flipped_by_player` marks a reveal caused by the
    /// current player action rather than a passive one.
    fn show_front(&mut self, flipped_by_player: bool);
    fn show_back(&mut self);

    fn disable(&mut self);
    fn enable(&mut self);

    /// Terminal: a matched card never accepts input again.
    fn set_matched(&mut self);
    /// Remove the card from the board.
    fn hide(&mut self);
    fn reset(&mut self);

    fn show_match_feedback(&mut self);
    fn show_mismatch_feedback(&mut self);

    fn is_face_up(&self) -> bool;
    fn is_flipped_by_player(&self) -> bool;
    fn is_matched(&self) -> bool;
    fn is_interactable(&self) -> bool;
}

/// Headless card: pure state, rendered by whichever front end reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    identity: SuitId,
    face_up: bool,
    flipped_by_player: bool,
    matched: bool,
    interactable: bool,
    hidden: bool,
    feedback: Feedback,
    reveal_count: u32,
}

impl Default for CardState {
    fn default() -> Self {
        CardState {
            identity: SuitId::default(),
            face_up: false,
            flipped_by_player: false,
            matched: false,
            interactable: true,
            hidden: false,
            feedback: Feedback::None,
            reveal_count: 0,
        }
    }
}

impl CardState {
    pub fn with_identity(identity: SuitId) -> Self {
        CardState {
            identity,
            ..CardState::default()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// Number of player reveals since the last deal (blind mode uses this).
    pub fn reveal_count(&self) -> u32 {
        self.reveal_count
    }
}

impl CardFace for CardState {
    fn identity(&self) -> &SuitId {
        &self.identity
    }

    fn deal(&mut self, identity: SuitId) {
        self.identity = identity;
        self.reset();
    }

    fn show_front(&mut self, flipped_by_player: bool) {
        self.face_up = true;
        self.feedback = Feedback::None;
        if flipped_by_player {
            self.flipped_by_player = true;
            self.reveal_count += 1;
        }
    }

    fn show_back(&mut self) {
        self.face_up = false;
        self.flipped_by_player = false;
        self.feedback = Feedback::None;
    }

    fn disable(&mut self) {
        self.interactable = false;
    }

    fn enable(&mut self) {
        if !self.matched {
            self.interactable = true;
        }
    }

    fn set_matched(&mut self) {
        self.matched = true;
        self.interactable = false;
    }

    fn hide(&mut self) {
        self.hidden = true;
    }

    fn reset(&mut self) {
        self.face_up = false;
        self.flipped_by_player = false;
        self.matched = false;
        self.interactable = true;
        self.hidden = false;
        self.feedback = Feedback::None;
        self.reveal_count = 0;
    }

    fn show_match_feedback(&mut self) {
        self.feedback = Feedback::Match;
        self.set_matched();
    }

    fn show_mismatch_feedback(&mut self) {
        self.feedback = Feedback::Mismatch;
        self.flipped_by_player = false;
    }

    fn is_face_up(&self) -> bool {
        self.face_up
    }

    fn is_flipped_by_player(&self) -> bool {
        self.flipped_by_player
    }

    fn is_matched(&self) -> bool {
        self.matched
    }

    fn is_interactable(&self) -> bool {
        self.interactable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_resets_every_flag() {
        let mut card = CardState::with_identity("moon".into());
        card.show_front(true);
        card.show_match_feedback();
        card.hide();

        card.deal("sun".into());
        assert_eq!(card, CardState::with_identity("sun".into()));
        assert!(card.is_interactable());
    }

    #[test]
    fn matched_card_stays_locked() {
        let mut card = CardState::with_identity("moon".into());
        card.show_front(true);
        card.show_match_feedback();
        assert!(card.is_matched());
        assert!(!card.is_interactable());

        card.enable();
        assert!(!card.is_interactable(), "enable must not unlock a matched card");
    }

    #[test]
    fn passive_reveal_is_not_counted() {
        let mut card = CardState::with_identity("moon".into());
        card.show_front(false);
        assert!(card.is_face_up());
        assert!(!card.is_flipped_by_player());
        assert_eq!(card.reveal_count(), 0);

        card.show_front(true);
        assert!(card.is_flipped_by_player());
        assert_eq!(card.reveal_count(), 1);
    }

    #[test]
    fn mismatch_feedback_drops_player_flag_but_stays_face_up() {
        let mut card = CardState::with_identity("moon".into());
        card.show_front(true);
        card.show_mismatch_feedback();
        assert!(card.is_face_up());
        assert!(!card.is_flipped_by_player());
        assert_eq!(card.feedback(), Feedback::Mismatch);

        card.show_back();
        assert!(!card.is_face_up());
        assert_eq!(card.feedback(), Feedback::None);
    }
}
