//! Exploration history storage
//!
//! Stores and retrieves visited places from a file-based store, newest first.
//! History is stored in XDG data directory (~/.local/share/latvia-explorer/).
//!
//! The file is treated as untrusted on load: entries that do not parse, or
//! whose coordinates fail validation, are dropped and the rest kept in order.

use crate::constants::storage::{APP_DIR_NAME, HISTORY_FILE_NAME, MAX_HISTORY_ENTRIES};
use crate::coord::validate::RawCoordinates;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::explorer::ResolvedLocation;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A visited place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Where the pin was placed
    pub coords: Coordinates,
    pub info: ResolvedLocation,
}

impl HistoryItem {
    /// Snapshot a resolved location, pinned at its final coordinate
    pub fn from_location(info: ResolvedLocation) -> Self {
        Self {
            id: info.id.clone(),
            timestamp: Utc::now().timestamp_millis(),
            coords: info.final_coordinate,
            info,
        }
    }
}

/// On-disk shape, before coordinate validation
#[derive(Deserialize)]
struct StoredItem {
    id: String,
    timestamp: i64,
    #[serde(default)]
    coords: Option<RawCoordinates>,
    info: ResolvedLocation,
}

impl StoredItem {
    fn validated(self) -> Option<HistoryItem> {
        let coords = self.coords.as_ref().and_then(RawCoordinates::validated)?;
        Some(HistoryItem {
            id: self.id,
            timestamp: self.timestamp,
            coords,
            info: self.info,
        })
    }
}

/// Keep the entries of a stored history that are safe to use
fn parse_entries(content: &str) -> Vec<HistoryItem> {
    let values: Vec<Value> = match serde_json::from_str(content) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "History file is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    let total = values.len();
    let entries: Vec<HistoryItem> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<StoredItem>(value) {
            Ok(stored) => stored.validated(),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable history entry");
                None
            }
        })
        .collect();

    if entries.len() < total {
        debug!(
            dropped = total - entries.len(),
            total, "Dropped invalid history entries"
        );
    }

    entries
}

/// History storage manager
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryItem>,
    path: PathBuf,
}

impl History {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the history file path
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(HISTORY_FILE_NAME))
    }

    /// Load history from disk
    pub fn load() -> Result<Self> {
        Self::load_from(Self::history_path()?)
    }

    /// Load history from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read history file: {}", e)))?;
            parse_entries(&content)
        } else {
            Vec::new()
        };

        Ok(Self { entries, path })
    }

    /// Save history to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create history directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| Error::Config(format!("Failed to serialize history: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| Error::Config(format!("Failed to write history file: {}", e)))?;

        Ok(())
    }

    /// Add an entry as the most recent, evicting the oldest beyond the cap
    pub fn add(&mut self, item: HistoryItem) {
        self.entries.insert(0, item);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    /// Record a resolved location
    pub fn add_location(&mut self, location: ResolvedLocation) -> &HistoryItem {
        self.add(HistoryItem::from_location(location));
        &self.entries[0]
    }

    /// Get all entries, newest first
    pub fn entries(&self) -> &[HistoryItem] {
        &self.entries
    }

    /// Get entry by ID
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Position of an entry, 0 being the newest
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Entry at `index`, 0 being the newest
    pub fn at(&self, index: usize) -> Option<&HistoryItem> {
        self.entries.get(index)
    }

    /// Remove entry by ID
    pub fn remove(&mut self, id: &str) -> Option<HistoryItem> {
        let idx = self.position(id)?;
        Some(self.entries.remove(idx))
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get most recent entries
    pub fn recent(&self, count: usize) -> &[HistoryItem] {
        &self.entries[..count.min(self.entries.len())]
    }
}
