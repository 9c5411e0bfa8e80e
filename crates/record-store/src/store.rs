//! Whole-collection load and save against a data directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::atomic_io::write_atomic;
use crate::error::StoreError;

/// Capability handle on the directory holding one JSON file per record type.
///
/// Every read returns the full collection and every write replaces it, so
/// callers perform read-modify-write cycles. There is no locking: two writers
/// racing on the same file resolve as last-writer-wins.
#[derive(Debug)]
pub struct EntityStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl EntityStore {
    /// Open the store rooted at `root`, creating the directory when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let open_error = |err: io::Error| StoreError::Open {
            path: root.to_path_buf(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(open_error)?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Directory the store was opened on.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Load every record stored in `file_name`.
    ///
    /// Absent, empty, unreadable or corrupt files all yield an empty
    /// collection. Failures are logged and never returned.
    #[must_use]
    pub fn load_all<R>(&self, file_name: &Utf8Path) -> Vec<R>
    where
        R: DeserializeOwned,
    {
        let contents = match self.dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(file = %file_name, "collection file absent; treating as empty");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    file = %self.root.join(file_name),
                    error = %err,
                    "collection file unreadable; treating as empty"
                );
                return Vec::new();
            }
        };

        if contents.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    file = %self.root.join(file_name),
                    error = %err,
                    "collection file corrupt; treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replace the contents of `file_name` with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] if a record cannot be encoded and
    /// [`StoreError::Write`] if the atomic replacement fails. In both cases
    /// the previously committed file is left untouched.
    pub fn save_all<R>(&self, file_name: &Utf8Path, records: &[R]) -> Result<(), StoreError>
    where
        R: Serialize,
    {
        let payload =
            serde_json::to_string_pretty(records).map_err(|err| StoreError::Serialize {
                path: self.root.join(file_name),
                message: err.to_string(),
            })?;
        write_atomic(&self.dir, file_name, &payload).map_err(|err| match err {
            StoreError::Write { path, message } => StoreError::Write {
                path: self.root.join(path),
                message,
            },
            other => other,
        })?;
        debug!(file = %file_name, count = records.len(), "collection committed");
        Ok(())
    }
}
