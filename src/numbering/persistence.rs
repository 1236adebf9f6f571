//! Counter persistence port.
//!
//! The allocator only talks to a `CounterStore`; the JSON file used in
//! production and the in-memory store used by tests both live here.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::NumberingError;

/// Durable numbering state.
///
/// Serialized exactly as `{ "financialYear": "24-25", "counter": 7 }`; external tools
/// that inspect or repair numbering rely on this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalCounter {
    #[serde(rename = "financialYear")]
    pub financial_year: String,
    pub counter: u32,
}

impl FiscalCounter {
    pub fn new(financial_year: impl Into<String>, counter: u32) -> Self {
        Self {
            financial_year: financial_year.into(),
            counter,
        }
    }
}

/// Storage for the single `FiscalCounter` record.
pub trait CounterStore: Send + Sync {
    /// Load the counter, `Ok(None)` when it has never been written.
    fn load(&self) -> Result<Option<FiscalCounter>, NumberingError>;

    /// Durably replace the counter. Must not return before the write is durable.
    fn save(&self, counter: &FiscalCounter) -> Result<(), NumberingError>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

/// Counter kept in a JSON file at a fixed path.
pub struct JsonFileCounterStore {
    path: PathBuf,
}

impl JsonFileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }

    fn write_error(&self, source: std::io::Error) -> NumberingError {
        NumberingError::CounterWrite {
            path: self.path_string(),
            source,
        }
    }
}

impl CounterStore for JsonFileCounterStore {
    fn load(&self) -> Result<Option<FiscalCounter>, NumberingError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(NumberingError::CounterRead {
                    path: self.path_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| NumberingError::CounterDecode {
                path: self.path_string(),
                source,
            })
    }

    fn save(&self, counter: &FiscalCounter) -> Result<(), NumberingError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let json = serde_json::to_vec_pretty(counter).map_err(|e| self.write_error(e.into()))?;

        // Write next to the target and rename so a crash never leaves a torn file.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(&json).map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        log::debug!(
            "Counter persisted to {} ({} #{})",
            self.path.display(),
            counter.financial_year,
            counter.counter
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path_string()
    }
}

/// Counter held in memory; used by tests and by callers that supply their own durability.
#[derive(Default)]
pub struct MemoryCounterStore {
    counter: Mutex<Option<FiscalCounter>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(counter: FiscalCounter) -> Self {
        Self {
            counter: Mutex::new(Some(counter)),
        }
    }

    pub fn snapshot(&self) -> Option<FiscalCounter> {
        self.counter.lock().clone()
    }
}

impl CounterStore for MemoryCounterStore {
    fn load(&self) -> Result<Option<FiscalCounter>, NumberingError> {
        Ok(self.counter.lock().clone())
    }

    fn save(&self, counter: &FiscalCounter) -> Result<(), NumberingError> {
        *self.counter.lock() = Some(counter.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
