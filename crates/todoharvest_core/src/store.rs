//! Per-tag task store persistence.
//!
//! # Responsibility
//! - Persist task text into `{root}/{tag}/todo.yml`, append-only.
//! - Deduplicate incoming tasks against the already-stored set by content id.
//! - Serialize concurrent writers with an exclusive advisory lock.
//!
//! # Invariants
//! - A store is never rewritten or pruned; only new entries are appended.
//! - Zero new entries means zero writes; the store file is left untouched.
//! - Within one store no two entries share a content id.
//! - The merge lock is released on every exit path, including errors.

use crate::ident;
use crate::model::task::ExtractedTask;
use fs2::FileExt;
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Store file name inside each tag directory.
pub const STORE_FILE: &str = "todo.yml";

/// Lock file guarding the read-merge-append sequence for one tag.
const LOCK_FILE: &str = ".lock";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for one tag store.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while creating, locking, reading or appending.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The persisted store exists but cannot be parsed.
    Corrupt { path: PathBuf, message: String },
    /// New entries could not be encoded for appending.
    Encode(serde_yaml::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store io failure at {}: {source}", path.display())
            }
            Self::Corrupt { path, message } => {
                write!(f, "corrupt store at {}: {message}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode store entries: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Encode(value)
    }
}

/// Merge counts for one tag, reported for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Incoming tasks for this tag in the batch.
    pub found: usize,
    /// Incoming tasks dropped because their content id was already stored.
    pub duplicates: usize,
    /// New entries appended to the store.
    pub added: usize,
}

/// RAII guard around the per-store advisory lock.
struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Handle on one tag's durable store directory.
pub struct TagStore {
    tag: String,
    dir: PathBuf,
}

impl TagStore {
    /// Addresses the store for `tag` under `root`. No filesystem access until
    /// [`TagStore::merge`] runs.
    pub fn open(root: &Path, tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            dir: root.join(tag),
        }
    }

    /// Path of the store file, whether or not it exists yet.
    pub fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Merges incoming tasks into the store, appending only entries whose
    /// content id is not already present.
    ///
    /// Holds an exclusive advisory lock for the whole read-merge-append
    /// sequence; two concurrent invocations on the same tag serialize here.
    ///
    /// # Errors
    /// - `StoreError::Corrupt` when an existing store file cannot be parsed.
    /// - `StoreError::Io` for directory creation, lock, read or append
    ///   failures.
    pub fn merge(&self, incoming: &[ExtractedTask]) -> StoreResult<MergeOutcome> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let _lock = self.acquire_lock()?;

        let mut known_ids = self.load_existing_ids()?;
        let mut new_entries: Vec<String> = Vec::new();
        for task in incoming {
            if known_ids.insert(task.task_id.clone()) {
                new_entries.push(task.task_text.clone());
            }
        }

        let outcome = MergeOutcome {
            found: incoming.len(),
            duplicates: incoming.len() - new_entries.len(),
            added: new_entries.len(),
        };

        if !new_entries.is_empty() {
            self.append_entries(&new_entries)?;
        }

        info!(
            "event=merge module=store status=ok tag={} found={} duplicates={} added={}",
            self.tag, outcome.found, outcome.duplicates, outcome.added
        );
        Ok(outcome)
    }

    fn acquire_lock(&self) -> StoreResult<StoreLock> {
        let lock_path = self.dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;
        file.lock_exclusive().map_err(|source| StoreError::Io {
            path: lock_path,
            source,
        })?;
        Ok(StoreLock { file })
    }

    /// Loads the content ids of all stored entries.
    ///
    /// Stored entries are already-normalized task text, so hashing them
    /// reproduces the original `task_id`.
    fn load_existing_ids(&self) -> StoreResult<HashSet<String>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(HashSet::new());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(HashSet::new());
        }
        let entries: Vec<String> =
            serde_yaml::from_str(&content).map_err(|err| StoreError::Corrupt {
                path,
                message: err.to_string(),
            })?;
        Ok(entries
            .iter()
            .map(|entry| ident::content_id(entry))
            .collect())
    }

    /// Appends new entries as additional items of the YAML sequence.
    fn append_entries(&self, entries: &[String]) -> StoreResult<()> {
        let path = self.store_path();
        let chunk = serde_yaml::to_string(entries)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        file.write_all(chunk.as_bytes())
            .map_err(|source| StoreError::Io { path, source })
    }
}
