//! Snapshot persistence: one JSON blob under a fixed key.
//!
//! DESIGN
//! ======
//! Storage is a plain key/value contract (`SnapshotStore`) so the engine
//! does not care whether the blob lands in memory, on disk, or in the
//! browser's `localStorage`. The board is loaded once at startup and saved
//! after every committed change.
//!
//! ERROR HANDLING
//! ==============
//! Loading never fails: a missing key yields an empty board, and a blob that
//! does not parse or violates the board's invariants is logged and replaced
//! by an empty board. Saving returns its error so the caller can log it; the
//! in-memory commit has already happened and is never rolled back.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::doc::{ColorMode, Snapshot, SnapshotError};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot rejected: {0}")]
    Invalid(#[from] SnapshotError),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Whether `key` can name a stored board: non-empty, and free of path
/// separators and parent references.
#[must_use]
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains(['/', '\\']) && !key.contains("..")
}

/// Key/value storage for serialized snapshots.
pub trait SnapshotStore {
    /// Fetch the blob under `key`; `Ok(None)` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store `blob` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn put(&mut self, key: &str, blob: &str) -> Result<(), PersistError>;
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Parse and validate a persisted blob. Connection points are recomputed
/// from the loaded notes, with `note_side` for notes that have no size.
///
/// # Errors
///
/// Returns `Json` when the blob does not parse, `Invalid` when the parsed
/// board breaks an invariant for `mode`.
pub fn decode_snapshot(blob: &str, mode: ColorMode, note_side: f64) -> Result<Snapshot, PersistError> {
    let mut snapshot: Snapshot = serde_json::from_str(blob)?;
    snapshot.validate(mode)?;
    snapshot.refresh_all_connections(note_side);
    Ok(snapshot)
}

/// Serialize a snapshot to its persisted form.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, PersistError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Load the board stored under `key`, falling back to an empty board.
#[must_use]
pub fn load_snapshot(store: &dyn SnapshotStore, key: &str, mode: ColorMode, note_side: f64) -> Snapshot {
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!(key, "no saved board; starting empty");
            return Snapshot::new();
        }
        Err(e) => {
            warn!(key, error = %e, "board load failed; starting empty");
            return Snapshot::new();
        }
    };
    match decode_snapshot(&blob, mode, note_side) {
        Ok(snapshot) => {
            info!(key, entities = snapshot.len(), "board loaded");
            snapshot
        }
        Err(e) => {
            warn!(key, error = %e, "saved board unreadable; starting empty");
            Snapshot::new()
        }
    }
}

/// Write `snapshot` under `key`.
///
/// # Errors
///
/// Propagates encode and storage failures.
pub fn save_snapshot(store: &mut dyn SnapshotStore, key: &str, snapshot: &Snapshot) -> Result<(), PersistError> {
    let blob = encode_snapshot(snapshot)?;
    store.put(key, &blob)
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store; the default for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `blob` under `key`.
    #[must_use]
    pub fn with_entry(key: &str, blob: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), blob.into());
        Self { entries }
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when `key` fails [`is_valid_storage_key`].
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        if !is_valid_storage_key(key) {
            return Err(PersistError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash mid-write never leaves a torn blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =============================================================================
// BROWSER STORE
// =============================================================================

/// The browser's `localStorage`.
#[cfg(feature = "web")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(feature = "web")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, PersistError> {
        let Some(window) = web_sys::window() else {
            return Err(PersistError::Unavailable("no window".to_owned()));
        };
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) | Err(_) => Err(PersistError::Unavailable("localStorage disabled".to_owned())),
        }
    }
}

#[cfg(feature = "web")]
impl SnapshotStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| PersistError::Unavailable(format!("read of {key} refused")))
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), PersistError> {
        Self::storage()?
            .set_item(key, blob)
            .map_err(|_| PersistError::Unavailable(format!("write of {key} refused")))
    }
}
