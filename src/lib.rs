//! # pairs-rs
//!
//! A memory-matching ("pairs") card game. Cards are dealt face down in a
//! grid; the player reveals two per turn, matching pairs leave the board and
//! mismatches turn back over after a short delay.
//!
//! ## Modules
//!
//! - `card`: card identity, the `CardFace` capability trait, headless `CardState`
//! - `pool`: the suit pool and the randomized pair deal
//! - `schedule`: cancellable timers advanced by the frame loop
//! - `engine`: turn resolution state machine
//! - `board`: the rows x columns grid
//! - `save`: save record, validation and stores
//! - `session`: the game session controller (scoring, boot, save/load)

pub mod board;
pub mod card;
pub mod engine;
pub mod error;
pub mod pool;
pub mod save;
pub mod schedule;
pub mod session;

pub use crate::board::Board;
pub use crate::card::{CardFace, CardState, Feedback, Suit, SuitId};
pub use crate::engine::{Cue, FLIP_BACK_DELAY, MatchEngine, MatchEvent, Phase, Selection};
pub use crate::error::{CorruptSave, DealError, LoadError, SaveError, UnknownIdentity};
pub use crate::pool::SuitPool;
pub use crate::save::{CardSnapshot, FileStore, MemoryStore, SaveRecord, SaveStore};
pub use crate::schedule::{Scheduler, TaskHandle};
pub use crate::session::{Boot, LoadOutcome, Notice, Score, Session};
