//! Persistence gateway.
//!
//! Writes the whole state as one record and reads it back. Loading never
//! fails: a missing, unreadable or corrupt record yields the default state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::snapshot::Snapshot;
use crate::error::{CoreError, Result};
use crate::state::AppState;

/// A place that holds one serialized record.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, contents: &str) -> Result<()>;
}

/// JSON record in a single file.
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
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::storage(&self.path, e)),
        }
    }

    /// Write to a sibling temp file, then rename over the record.
    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::storage(parent, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| CoreError::storage(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| CoreError::storage(&self.path, e))
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            unavailable: false,
        }
    }

    /// A store whose every read and write fails.
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            unavailable: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    fn failure(&self) -> CoreError {
        CoreError::storage(
            "memory",
            std::io::Error::new(ErrorKind::Other, "store unavailable"),
        )
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        if self.unavailable {
            return Err(self.failure());
        }
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if self.unavailable {
            return Err(self.failure());
        }
        let mut guard = self.contents.lock().map_err(|_| self.failure())?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: SnapshotStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a snapshot of `state`. The running flag and live handles are not
    /// written.
    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = Snapshot::capture(state).to_json()?;
        self.store.write(&json)?;
        debug!(bytes = json.len(), "snapshot saved");
        Ok(())
    }

    /// The stored state, `Ok(None)` when nothing was stored.
    pub fn try_load(&self, today: NaiveDate) -> Result<Option<AppState>> {
        let Some(json) = self.store.read()? else {
            return Ok(None);
        };
        let state = Snapshot::from_json(&json)?.into_state(today)?;
        Ok(Some(state))
    }

    /// The stored state, or the default state when none can be used.
    pub fn load(&self, today: NaiveDate) -> AppState {
        match self.try_load(today) {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no snapshot stored, starting fresh");
                AppState::default()
            }
            Err(e) => {
                warn!(error = %e, "snapshot unusable, starting from defaults");
                AppState::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn empty_store_loads_defaults() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        assert!(gateway.try_load(today()).unwrap().is_none());
        let state = gateway.load(today());
        assert_eq!(state.clock.time_left_secs(), 1500);
    }

    #[test]
    fn corrupt_record_loads_defaults() {
        let gateway = PersistenceGateway::new(MemoryStore::with_contents("[1, 2"));
        assert!(matches!(
            gateway.try_load(today()),
            Err(CoreError::CorruptSnapshot(_))
        ));
        assert_eq!(gateway.load(today()).scheduler.session_count(), 0);
    }

    #[test]
    fn unavailable_store_reports_and_falls_back() {
        let gateway = PersistenceGateway::new(MemoryStore::unavailable());
        assert!(matches!(
            gateway.save(&AppState::default()),
            Err(CoreError::StorageUnavailable { .. })
        ));
        assert!(matches!(
            gateway.try_load(today()),
            Err(CoreError::StorageUnavailable { .. })
        ));
        assert!(!gateway.load(today()).is_running());
    }

    #[test]
    fn running_state_reloads_paused() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let mut state = AppState::default();
        state.start();
        for _ in 0..42 {
            state.tick(today());
        }
        gateway.save(&state).unwrap();

        let loaded = gateway.load(today());
        assert!(!loaded.is_running());
        assert_eq!(loaded.clock.time_left_secs(), 1500 - 42);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state.json"));
        assert!(store.read().unwrap().is_none());
        store.write("{\"theme\":\"dark\"}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{\"theme\":\"dark\"}"));
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn file_store_treats_blank_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(FileStore::new(path).read().unwrap().is_none());
    }
}
