//! Persistence collaborators: settings store and history recorder
//!
//! Layout of a `JsonFileStore` directory:
//! - `settings.json`: flat keyed settings record (pretty JSON)
//! - `history.jsonl`: one `SessionRecord` per line, append-only
//! - `rounds.jsonl`: one `RoundRecord` per line, append-only

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use crate::types::{GameError, GameSettings, RoundRecord, SessionRecord};

pub const SETTINGS_FILE: &str = "settings.json";
pub const HISTORY_FILE: &str = "history.jsonl";
pub const ROUNDS_FILE: &str = "rounds.jsonl";

/// Load/save `GameSettings` as a flat keyed record
pub trait SettingsStore {
    /// Stored settings, or defaults when nothing is stored yet
    fn load(&self) -> Result<GameSettings, GameError>;
    fn save(&mut self, settings: &GameSettings) -> Result<(), GameError>;
}

/// Append-only archive of finished rounds and sessions
pub trait HistoryRecorder {
    fn record_round(&mut self, _record: &RoundRecord) -> Result<(), GameError> {
        Ok(())
    }
    fn record_session(&mut self, record: &SessionRecord) -> Result<(), GameError>;
    fn load_history(&self) -> Result<Vec<SessionRecord>, GameError>;
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn append_line<T: Serialize>(&self, file: &str, value: &T) -> Result<(), GameError> {
        fs::create_dir_all(&self.dir)?;
        let line = serde_json::to_string(value)?;
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(file))?;
        writeln!(handle, "{line}")?;
        Ok(())
    }

    /// Every parseable line; corrupt lines are skipped
    fn read_lines<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, GameError> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path)?;
        let mut out = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(value) => out.push(value),
                Err(e) => warn!(file, line = lineno + 1, error = %e, "skipping corrupt record"),
            }
        }
        Ok(out)
    }

    pub fn load_rounds(&self) -> Result<Vec<RoundRecord>, GameError> {
        self.read_lines(ROUNDS_FILE)
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<GameSettings, GameError> {
        let path = self.path(SETTINGS_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no stored settings, using defaults");
            return Ok(GameSettings::default());
        }
        let text = fs::read_to_string(&path)?;
        let record: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)?;
        GameSettings::from_record(record)
    }

    fn save(&mut self, settings: &GameSettings) -> Result<(), GameError> {
        settings.validate()?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&settings.to_record()?)?;
        fs::write(self.path(SETTINGS_FILE), json)?;
        Ok(())
    }
}

impl HistoryRecorder for JsonFileStore {
    fn record_round(&mut self, record: &RoundRecord) -> Result<(), GameError> {
        self.append_line(ROUNDS_FILE, record)
    }

    fn record_session(&mut self, record: &SessionRecord) -> Result<(), GameError> {
        self.append_line(HISTORY_FILE, record)
    }

    fn load_history(&self) -> Result<Vec<SessionRecord>, GameError> {
        self.read_lines(HISTORY_FILE)
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    settings: Option<GameSettings>,
    rounds: Vec<RoundRecord>,
    sessions: Vec<SessionRecord>,
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, GameError> {
        self.inner
            .lock()
            .map_err(|_| GameError::storage("memory store lock poisoned"))
    }

    pub fn rounds(&self) -> Result<Vec<RoundRecord>, GameError> {
        Ok(self.lock()?.rounds.clone())
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<GameSettings, GameError> {
        Ok(self.lock()?.settings.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &GameSettings) -> Result<(), GameError> {
        settings.validate()?;
        self.lock()?.settings = Some(settings.clone());
        Ok(())
    }
}

impl HistoryRecorder for MemoryStore {
    fn record_round(&mut self, record: &RoundRecord) -> Result<(), GameError> {
        self.lock()?.rounds.push(record.clone());
        Ok(())
    }

    fn record_session(&mut self, record: &SessionRecord) -> Result<(), GameError> {
        self.lock()?.sessions.push(record.clone());
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<SessionRecord>, GameError> {
        Ok(self.lock()?.sessions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        let mut settings = GameSettings::default();
        settings.num_premises = 4;
        writer.save(&settings).unwrap();
        assert_eq!(store.load().unwrap().num_premises, 4);
    }

    #[test]
    fn test_memory_store_rejects_invalid_settings() {
        let mut store = MemoryStore::new();
        let mut settings = GameSettings::default();
        settings.num_premises = 1;
        assert!(store.save(&settings).unwrap_err().is_configuration());
    }
}
