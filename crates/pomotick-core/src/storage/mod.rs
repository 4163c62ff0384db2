mod config;
pub mod gateway;
pub mod snapshot;

pub use config::{Config, LogConfig, NotificationsConfig, TimerConfig, MIN_TICK_INTERVAL_MS};
pub use gateway::{FileStore, MemoryStore, PersistenceGateway, SnapshotStore};
pub use snapshot::Snapshot;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// File name of the persisted timer state inside the data directory.
pub const STATE_FILE: &str = "state.json";

/// Returns the data directory, creating it if needed.
///
/// `POMOTICK_HOME` overrides the location. Otherwise it is
/// `~/.config/pomotick[-dev]/`, with `POMOTICK_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOTICK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotick-dev")
            } else {
                base_dir.join("pomotick")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| CoreError::storage(&dir, e))?;
    Ok(dir)
}

/// File store at `<data dir>/state.json`.
pub fn default_store() -> Result<FileStore> {
    Ok(FileStore::new(data_dir()?.join(STATE_FILE)))
}
