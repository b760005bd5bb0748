//! Save record shape and the stores that persist it.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::card::SuitId;
use crate::error::{CorruptSave, SaveError};

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY: &[u8] = b"pairs_save_key_do_not_peek";
const HMAC_SIZE: usize = 32;

/// Persisted state of one board slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub suit_id: SuitId,
    pub is_matched: bool,
    pub flipped_by_player: bool,
    pub is_pending_first_selection: bool,
}

/// Everything needed to resume a game, including a half-played turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub rows: usize,
    pub columns: usize,
    pub cards: Vec<CardSnapshot>,
    pub turn: u32,
    pub points: u32,
    pub combo_multiplier: u32,
}

impl SaveRecord {
    /// Structural checks; a record failing them is treated as no save.
    pub fn validate(&self) -> Result<(), CorruptSave> {
        let (rows, columns) = (self.rows, self.columns);
        let expected = match rows.checked_mul(columns) {
            Some(slots) if slots > 0 && slots % 2 == 0 => slots,
            _ => return Err(CorruptSave::BadDimensions { rows, columns }),
        };
        if self.cards.len() != expected {
            return Err(CorruptSave::CardCount {
                rows,
                columns,
                expected,
                found: self.cards.len(),
            });
        }

        let count = self
            .cards
            .iter()
            .filter(|c| c.is_pending_first_selection)
            .count();
        if count > 1 {
            return Err(CorruptSave::MultiplePending { count });
        }
        Ok(())
    }
}

/// Persistence collaborator for the session.
pub trait SaveStore {
    fn write(&mut self, record: &SaveRecord) -> Result<(), SaveError>;
    /// `Ok(None)` when nothing has been saved.
    fn read(&self) -> Result<Option<SaveRecord>, SaveError>;
    /// Removing a save that does not exist is not an error.
    fn delete(&mut self) -> Result<(), SaveError>;
}

/// Keeps the record in memory; for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<SaveRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SaveRecord) -> Self {
        MemoryStore {
            record: Some(record),
        }
    }

    pub fn record(&self) -> Option<&SaveRecord> {
        self.record.as_ref()
    }
}

impl SaveStore for MemoryStore {
    fn write(&mut self, record: &SaveRecord) -> Result<(), SaveError> {
        self.record = Some(record.clone());
        Ok(())
    }

    fn read(&self) -> Result<Option<SaveRecord>, SaveError> {
        Ok(self.record.clone())
    }

    fn delete(&mut self) -> Result<(), SaveError> {
        self.record = None;
        Ok(())
    }
}

/// Signed on-disk save: a bincode payload followed by its HMAC-SHA256.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// The per-user data directory location (`save.dat`).
    pub fn default_location() -> Result<Self, SaveError> {
        let proj_dirs = ProjectDirs::from("com", "pairs", "pairs").ok_or(SaveError::NoDataDir)?;
        Ok(Self::at(proj_dirs.data_dir().join("save.dat")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mac() -> Result<HmacSha256, SaveError> {
        HmacSha256::new_from_slice(SECRET_KEY).map_err(|_| SaveError::Key)
    }
}

impl SaveStore for FileStore {
    /// Write atomically: temp file, fsync, then rename over the old save.
    fn write(&mut self, record: &SaveRecord) -> Result<(), SaveError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let payload = bincode::serialize(record).map_err(|source| SaveError::Encode { source })?;
        let mut mac = Self::mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        let mut data = payload;
        data.extend_from_slice(&signature);

        let mut temp_path = self.path.clone();
        temp_path.set_extension("tmp");

        let result = File::create(&temp_path).and_then(|mut file| {
            file.write_all(&data)?;
            file.sync_all()
        });
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), bytes = data.len(), "Game saved");
        Ok(())
    }

    fn read(&self) -> Result<Option<SaveRecord>, SaveError> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No save file found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        if data.len() < HMAC_SIZE {
            warn!(path = %self.path.display(), "Save file too short to be signed");
            return Err(CorruptSave::Signature.into());
        }

        let (payload, signature) = data.split_at(data.len() - HMAC_SIZE);
        let mut mac = Self::mac()?;
        mac.update(payload);
        if mac.verify_slice(signature).is_err() {
            warn!(path = %self.path.display(), "Save file signature mismatch");
            return Err(CorruptSave::Signature.into());
        }

        bincode::deserialize(payload).map(Some).map_err(|e| {
            CorruptSave::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    fn delete(&mut self) -> Result<(), SaveError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Save deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, matched: bool, pending: bool) -> CardSnapshot {
        CardSnapshot {
            suit_id: id.into(),
            is_matched: matched,
            flipped_by_player: pending,
            is_pending_first_selection: pending,
        }
    }

    fn record() -> SaveRecord {
        SaveRecord {
            rows: 2,
            columns: 2,
            cards: vec![
                snapshot("a", true, false),
                snapshot("b", false, true),
                snapshot("a", true, false),
                snapshot("b", false, false),
            ],
            turn: 3,
            points: 1,
            combo_multiplier: 2,
        }
    }

    fn temp_store(name: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!("pairs-rs-test-{}-{}", std::process::id(), name));
        FileStore::at(dir.join("save.dat"))
    }

    #[test]
    fn valid_record_passes() {
        assert_eq!(record().validate(), Ok(()));
    }

    #[test]
    fn wrong_card_count_is_corrupt() {
        let mut rec = record();
        rec.cards.pop();
        assert_eq!(
            rec.validate(),
            Err(CorruptSave::CardCount {
                rows: 2,
                columns: 2,
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn two_pending_selections_are_corrupt() {
        let mut rec = record();
        rec.cards[3].is_pending_first_selection = true;
        assert_eq!(rec.validate(), Err(CorruptSave::MultiplePending { count: 2 }));
    }

    #[test]
    fn odd_or_empty_board_is_corrupt() {
        let mut rec = record();
        rec.rows = 3;
        rec.columns = 3;
        assert!(matches!(rec.validate(), Err(CorruptSave::BadDimensions { .. })));
        rec.rows = 0;
        rec.columns = 2;
        assert!(matches!(rec.validate(), Err(CorruptSave::BadDimensions { .. })));
    }

    #[test]
    fn overflowing_dimensions_are_corrupt() {
        let mut rec = record();
        rec.rows = usize::MAX / 2 + 1;
        rec.columns = 2;
        rec.cards.clear();
        assert_eq!(
            rec.validate(),
            Err(CorruptSave::BadDimensions {
                rows: usize::MAX / 2 + 1,
                columns: 2
            })
        );
    }

    #[test]
    fn file_store_round_trip_and_delete() {
        let mut store = temp_store("roundtrip");
        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());

        store.write(&record()).unwrap();
        assert_eq!(store.read().unwrap(), Some(record()));

        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());
        store.delete().unwrap();
    }

    #[test]
    fn tampered_file_is_rejected() {
        let mut store = temp_store("tamper");
        store.write(&record()).unwrap();

        let mut bytes = fs::read(store.path()).unwrap();
        bytes[0] ^= 0xff;
        fs::write(store.path(), &bytes).unwrap();

        assert!(matches!(
            store.read(),
            Err(SaveError::Corrupt {
                source: CorruptSave::Signature
            })
        ));
        store.delete().unwrap();
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut store = temp_store("short");
        store.write(&record()).unwrap();
        fs::write(store.path(), b"tiny").unwrap();
        assert!(matches!(store.read(), Err(SaveError::Corrupt { .. })));
        store.delete().unwrap();
    }

    #[test]
    fn memory_store_behaves_like_a_store() {
        let mut store = MemoryStore::new();
        assert!(store.read().unwrap().is_none());
        store.write(&record()).unwrap();
        assert_eq!(store.record(), Some(&record()));
        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());
    }
}
