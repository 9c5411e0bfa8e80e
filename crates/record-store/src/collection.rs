//! Typed CRUD over one collection file.

use std::marker::PhantomData;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::identifier::{format_identifier, next_sequence, split_identifier};
use crate::store::EntityStore;

/// Suffix of the sidecar file recording the highest suffix issued per prefix.
pub const SEQUENCE_SUFFIX: &str = ".seq";

/// A value that can live in a [`Collection`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Identifier unique within the record's collection.
    fn record_id(&self) -> &str;
}

/// Highest suffix ever issued or deleted for one prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SequenceMark {
    prefix: String,
    last_issued: u64,
}

/// Ordered collection of `R` persisted as a single file in an [`EntityStore`].
///
/// Every operation reloads the file, so a `Collection` holds no cached
/// state and can be cloned freely. A sidecar file (`<file>.seq`) keeps the
/// highest suffix handed out per prefix so identifiers of deleted records
/// are never issued again.
#[derive(Debug)]
pub struct Collection<R> {
    store: Arc<EntityStore>,
    file_name: Utf8PathBuf,
    _records: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            file_name: self.file_name.clone(),
            _records: PhantomData,
        }
    }
}

impl<R: Record> Collection<R> {
    /// Bind a collection to `file_name` inside `store`.
    pub fn new(store: Arc<EntityStore>, file_name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            store,
            file_name: file_name.into(),
            _records: PhantomData,
        }
    }

    /// File backing this collection, relative to the store root.
    #[must_use]
    pub fn file_name(&self) -> &Utf8Path {
        &self.file_name
    }

    /// Every record, in stored order.
    #[must_use]
    pub fn find_all(&self) -> Vec<R> {
        self.store.load_all(&self.file_name)
    }

    /// The record with `id`, if any. An empty id never matches.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<R> {
        if id.is_empty() {
            return None;
        }
        self.find_all()
            .into_iter()
            .find(|record| record.record_id() == id)
    }

    /// Whether a record with `id` exists.
    #[must_use]
    pub fn exists_by_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Records accepted by `predicate`, in stored order.
    pub fn find_where<P>(&self, mut predicate: P) -> Vec<R>
    where
        P: FnMut(&R) -> bool,
    {
        self.find_all()
            .into_iter()
            .filter(|record| predicate(record))
            .collect()
    }

    /// Allocate the next `prefix` identifier, build the record and append it.
    ///
    /// `build` receives the freshly allocated identifier; callers cannot
    /// choose their own. The identifier is reserved before the collection is
    /// written, so a failed write leaves a gap rather than a reused id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the reservation or the collection cannot be
    /// written.
    pub fn create<F>(&self, prefix: &str, build: F) -> Result<R, StoreError>
    where
        F: FnOnce(String) -> R,
    {
        let mut records = self.find_all();
        let mut marks = self.load_marks();
        let last_issued = marks
            .iter()
            .find(|mark| mark.prefix == prefix)
            .map_or(0, |mark| mark.last_issued);
        let sequence = next_sequence(records.iter().map(Record::record_id), prefix, last_issued);
        raise_mark(&mut marks, prefix, sequence);
        self.store.save_all(&self.sequence_file(), &marks)?;

        let record = build(format_identifier(prefix, sequence));
        records.push(record.clone());
        self.store.save_all(&self.file_name, &records)?;
        debug!(file = %self.file_name, id = record.record_id(), "record created");
        Ok(record)
    }

    /// Replace the stored record sharing `record`'s identifier.
    ///
    /// Returns `Ok(None)` without writing when no record matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection cannot be written back.
    pub fn update(&self, record: R) -> Result<Option<R>, StoreError> {
        let mut records = self.find_all();
        let Some(slot) = records
            .iter_mut()
            .find(|existing| existing.record_id() == record.record_id())
        else {
            return Ok(None);
        };
        *slot = record.clone();
        self.store.save_all(&self.file_name, &records)?;
        debug!(file = %self.file_name, id = record.record_id(), "record updated");
        Ok(Some(record))
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection cannot be written back.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.find_all();
        let before = records.len();
        records.retain(|record| record.record_id() != id);
        if records.len() == before {
            return Ok(false);
        }
        if let Some((prefix, sequence)) = split_identifier(id) {
            let mut marks = self.load_marks();
            if raise_mark(&mut marks, prefix, sequence) {
                self.store.save_all(&self.sequence_file(), &marks)?;
            }
        }
        self.store.save_all(&self.file_name, &records)?;
        debug!(file = %self.file_name, id, "record deleted");
        Ok(true)
    }

    fn sequence_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{SEQUENCE_SUFFIX}", self.file_name))
    }

    fn load_marks(&self) -> Vec<SequenceMark> {
        self.store.load_all(&self.sequence_file())
    }
}

/// Record `sequence` for `prefix` if it exceeds the stored mark. Returns
/// whether the marks changed.
fn raise_mark(marks: &mut Vec<SequenceMark>, prefix: &str, sequence: u64) -> bool {
    match marks.iter_mut().find(|mark| mark.prefix == prefix) {
        Some(mark) if mark.last_issued >= sequence => false,
        Some(mark) => {
            mark.last_issued = sequence;
            true
        }
        None => {
            marks.push(SequenceMark {
                prefix: prefix.to_owned(),
                last_issued: sequence,
            });
            true
        }
    }
}
