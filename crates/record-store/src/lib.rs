//! File-backed record collections with atomic replacement.
//!
//! Each record type lives in its own JSON file inside a data directory. A
//! collection is always read and rewritten in full; writes go through a
//! sibling `.tmp` file that is renamed over the target, so an interrupted
//! write never corrupts the last committed state. Reads are forgiving: an
//! absent, empty or corrupt file loads as an empty collection.
//!
//! Identifiers are allocated by the store as `<prefix><nnn>`. The highest
//! suffix ever issued is remembered per prefix, so deleting the newest record
//! never frees its identifier for reuse.
//!
//! The crate knows nothing about the records it stores beyond the
//! [`Record`] trait, which keeps it independent of the backend domain.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use camino::Utf8Path;
//! use record_store::{Collection, EntityStore, Record};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Note {
//!     id: String,
//!     body: String,
//! }
//!
//! impl Record for Note {
//!     fn record_id(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! let scratch = tempfile::tempdir().expect("temp dir");
//! let root = Utf8Path::from_path(scratch.path()).expect("utf-8 temp dir");
//! let store = Arc::new(EntityStore::open(root).expect("open store"));
//! let notes: Collection<Note> = Collection::new(store, "notes.json");
//!
//! let note = notes
//!     .create("N", |id| Note { id, body: "hello".to_owned() })
//!     .expect("create note");
//! assert_eq!(note.id, "N001");
//! assert!(notes.exists_by_id("N001"));
//! ```

mod atomic_io;
mod collection;
mod error;
mod identifier;
mod store;

pub use atomic_io::{TEMP_SUFFIX, temp_file_name};
pub use collection::{Collection, Record, SEQUENCE_SUFFIX};
pub use error::StoreError;
pub use identifier::{format_identifier, next_identifier, next_sequence, split_identifier};
pub use store::EntityStore;
