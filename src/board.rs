use crate::card::{CardFace, CardState, SuitId};
use crate::error::DealError;

/// Smallest row/column count the game offers.
pub const MIN_SIDE: usize = 2;
/// Largest row/column count the game offers.
pub const MAX_SIDE: usize = 6;

/// The card grid, stored row-major. A card's slot index is its identity on
/// the board for the whole game.
#[derive(Debug, Clone)]
pub struct Board<C = CardState> {
    rows: usize,
    columns: usize,
    cards: Vec<C>,
}

impl<C: CardFace + Default> Board<C> {
    /// Create `rows * columns` fresh, undealt cards.
    pub fn build(rows: usize, columns: usize) -> Self {
        let cards = (0..rows * columns).map(|_| C::default()).collect();
        Board {
            rows,
            columns,
            cards,
        }
    }

    /// Build a board and deal `identities` onto it in order.
    pub fn dealt(rows: usize, columns: usize, identities: Vec<SuitId>) -> Result<Self, DealError> {
        let mut board = Self::build(rows, columns);
        board.deal(identities)?;
        Ok(board)
    }
}

impl<C: CardFace> Board<C> {
    /// Give every slot its identity, in slot order.
    pub fn deal(&mut self, identities: Vec<SuitId>) -> Result<(), DealError> {
        if identities.len() != self.cards.len() {
            return Err(DealError::SizeMismatch {
                dealt: identities.len(),
                slots: self.cards.len(),
            });
        }
        for (card, id) in self.cards.iter_mut().zip(identities) {
            card.deal(id);
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Slot index of the card at (`row`, `column`), if on the board.
    pub fn slot(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    /// (`row`, `column`) of a slot, if on the board.
    pub fn position(&self, slot: usize) -> Option<(usize, usize)> {
        (slot < self.cards.len()).then(|| (slot / self.columns, slot % self.columns))
    }

    pub fn card(&self, slot: usize) -> Option<&C> {
        self.cards.get(slot)
    }

    pub fn cards(&self) -> &[C] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [C] {
        &mut self.cards
    }

    /// Iterate the grid one row at a time.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[C]> {
        self.cards.chunks(self.columns.max(1))
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }
}
