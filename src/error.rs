//! Error types for dealing, persistence and loading.

use derive_more::{Display, Error};

use crate::card::SuitId;

/// A deal could not be produced or placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DealError {
    #[display("not enough suits: {pairs} pairs requested but the pool holds {available}")]
    InsufficientSuits { pairs: usize, available: usize },
    #[display("cannot deal an odd number of cards ({cards})")]
    OddCardCount { cards: usize },
    #[display("suit '{id}' is not in the pool")]
    UnknownSuit { id: SuitId },
    #[display("a deal of {dealt} cards does not fit a board of {slots} slots")]
    SizeMismatch { dealt: usize, slots: usize },
}

/// A saved identity no longer exists in the suit pool.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown suit identity '{id}'")]
pub struct UnknownIdentity {
    pub id: SuitId,
}

/// A save record that cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CorruptSave {
    #[display("save holds {found} cards but a {rows}x{columns} board needs {expected}")]
    CardCount {
        rows: usize,
        columns: usize,
        expected: usize,
        found: usize,
    },
    #[display("save marks {count} cards as the pending first selection")]
    MultiplePending { count: usize },
    #[display("save describes an unplayable {rows}x{columns} board")]
    BadDimensions { rows: usize, columns: usize },
    #[display("save file signature mismatch")]
    Signature,
    #[display("save payload could not be decoded: {message}")]
    Decode { message: String },
}

/// Failure of the persistence collaborator.
#[derive(Debug, Display, Error)]
pub enum SaveError {
    #[display("no data directory available for the save file")]
    NoDataDir,
    #[display("save signing key rejected")]
    Key,
    #[display("save file i/o failed: {source}")]
    Io { source: std::io::Error },
    #[display("save record could not be encoded: {source}")]
    Encode { source: bincode::Error },
    #[display("{source}")]
    Corrupt { source: CorruptSave },
}

impl From<std::io::Error> for SaveError {
    fn from(source: std::io::Error) -> Self {
        SaveError::Io { source }
    }
}

impl From<CorruptSave> for SaveError {
    fn from(source: CorruptSave) -> Self {
        SaveError::Corrupt { source }
    }
}

/// A save exists but the session could not be restored from it.
#[derive(Debug, Display, Error)]
pub enum LoadError {
    #[display("cannot restore save: {source}")]
    UnknownIdentity { source: UnknownIdentity },
    #[display("cannot read save: {source}")]
    Store { source: SaveError },
}

impl From<UnknownIdentity> for LoadError {
    fn from(source: UnknownIdentity) -> Self {
        LoadError::UnknownIdentity { source }
    }
}

impl From<SaveError> for LoadError {
    fn from(source: SaveError) -> Self {
        LoadError::Store { source }
    }
}
