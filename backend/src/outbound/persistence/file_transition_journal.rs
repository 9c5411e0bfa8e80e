//! File-backed [`TransitionJournal`].
//!
//! The journal file holds a JSON array with zero or one intent and is
//! replaced atomically like every other collection.

use std::sync::Arc;

use camino::Utf8Path;
use record_store::{EntityStore, StoreError};

use super::TRANSITIONS_FILE;
use crate::domain::TransitionIntent;
use crate::domain::ports::{TransitionJournal, TransitionJournalError};

fn map_store_error(error: StoreError) -> TransitionJournalError {
    TransitionJournalError::write(error.to_string())
}

/// Pending transition stored in `transitions.json`.
#[derive(Debug, Clone)]
pub struct FileTransitionJournal {
    store: Arc<EntityStore>,
}

impl FileTransitionJournal {
    /// Bind the journal to `store`.
    pub const fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    fn file() -> &'static Utf8Path {
        Utf8Path::new(TRANSITIONS_FILE)
    }
}

impl TransitionJournal for FileTransitionJournal {
    fn pending(&self) -> Option<TransitionIntent> {
        self.store
            .load_all::<TransitionIntent>(Self::file())
            .into_iter()
            .last()
    }

    fn record(&self, intent: &TransitionIntent) -> Result<(), TransitionJournalError> {
        self.store
            .save_all(Self::file(), std::slice::from_ref(intent))
            .map_err(map_store_error)
    }

    fn clear(&self) -> Result<(), TransitionJournalError> {
        self.store
            .save_all::<TransitionIntent>(Self::file(), &[])
            .map_err(map_store_error)
    }
}
