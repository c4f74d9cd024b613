//! Snapshot stores
//!
//! A store holds a single snapshot, overwritten on every save. Writes are
//! whole-snapshot: the previous payload stays intact until the new one is
//! complete.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{Result, TacticsError};
use crate::persistence::snapshot::Snapshot;

/// Persistent storage for the current game
pub trait StateStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Stored snapshot, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<Snapshot>>;
}

/// In-memory store holding the encoded payload, like browser local storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    payload: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw payload
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.payload = Some(snapshot.to_json()?);
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        match self.payload.as_deref() {
            None | Some("") => Ok(None),
            Some(payload) => Snapshot::from_json(payload).map(Some),
        }
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TacticsError::IoError(e)),
        };
        if payload.trim().is_empty() {
            return Ok(None);
        }
        Snapshot::from_json(&payload).map(Some)
    }
}
