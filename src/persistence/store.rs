//! Key-value backends for the save record

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::SaveData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save file i/o: {0}")]
    Io(#[from] io::Error),
    #[error("save data is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage for the single save record
pub trait SaveStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<SaveData>, StoreError>;
    fn save(&mut self, data: &SaveData) -> Result<(), StoreError>;
}

/// Load the record, degrading to defaults if it is missing or unreadable
pub fn load_or_default<S: SaveStore + ?Sized>(store: &S) -> SaveData {
    match store.load() {
        Ok(Some(data)) => {
            log::info!(
                "Loaded save: {} currency, upgrades {:?}",
                data.total_currency,
                data.upgrades
            );
            data
        }
        Ok(None) => {
            log::info!("No save found, starting fresh");
            SaveData::default()
        }
        Err(e) => {
            log::warn!("Discarding unreadable save ({e}), starting fresh");
            SaveData::default()
        }
    }
}

/// Save record as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> Result<Option<SaveData>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, data: &SaveData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        // tmp -> save
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Saved progress to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store holding the serialized record
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    /// Number of successful saves
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with raw JSON (which may be invalid)
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            writes: 0,
        }
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<SaveData>, StoreError> {
        match &self.json {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, data: &SaveData) -> Result<(), StoreError> {
        self.json = Some(serde_json::to_string(data)?);
        self.writes += 1;
        Ok(())
    }
}
