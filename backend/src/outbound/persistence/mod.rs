//! File-backed persistence adapters.
//!
//! Each entity type lives in one JSON file under the data directory and is
//! read and rewritten whole through a [`record_store::Collection`].
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between domain types and
//!   stored records. Filtering is a full scan with a predicate.
//! - **Forgiving reads**: an absent or corrupt file reads as empty; the store
//!   logs the problem.
//! - **Strongly typed errors**: store write failures are mapped to each
//!   port's persistence error.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use ticketdesk::domain::ports::UserRepository;
//! use ticketdesk::outbound::persistence::FileRepositories;
//!
//! let scratch = tempfile::tempdir().expect("temp dir");
//! let root = Utf8Path::from_path(scratch.path()).expect("utf-8 path");
//! let repos = FileRepositories::open(root).expect("open data directory");
//! assert!(repos.users.find_all().is_empty());
//! ```

mod file_response_repository;
mod file_technician_repository;
mod file_ticket_repository;
mod file_transition_journal;
mod file_user_repository;

use std::sync::Arc;

use camino::Utf8Path;
use record_store::{EntityStore, StoreError};

pub use file_response_repository::FileResponseRepository;
pub use file_technician_repository::FileTechnicianRepository;
pub use file_ticket_repository::FileTicketRepository;
pub use file_transition_journal::FileTransitionJournal;
pub use file_user_repository::FileUserRepository;

/// File holding client and administrator accounts.
pub const USERS_FILE: &str = "users.json";
/// File holding technicians.
pub const TECHNICIANS_FILE: &str = "technicians.json";
/// File holding tickets.
pub const TICKETS_FILE: &str = "tickets.json";
/// File holding responses.
pub const RESPONSES_FILE: &str = "responses.json";
/// File holding the pending transition intent, if any.
pub const TRANSITIONS_FILE: &str = "transitions.json";

/// Every file-backed adapter, sharing one opened data directory.
#[derive(Debug, Clone)]
pub struct FileRepositories {
    /// User accounts.
    pub users: Arc<FileUserRepository>,
    /// Technicians.
    pub technicians: Arc<FileTechnicianRepository>,
    /// Tickets.
    pub tickets: Arc<FileTicketRepository>,
    /// Responses.
    pub responses: Arc<FileResponseRepository>,
    /// Transition journal.
    pub journal: Arc<FileTransitionJournal>,
}

impl FileRepositories {
    /// Open (creating if needed) the data directory and bind every adapter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the directory cannot be created or
    /// opened.
    pub fn open(data_dir: &Utf8Path) -> Result<Self, StoreError> {
        let store = Arc::new(EntityStore::open(data_dir)?);
        Ok(Self {
            users: Arc::new(FileUserRepository::new(Arc::clone(&store))),
            technicians: Arc::new(FileTechnicianRepository::new(Arc::clone(&store))),
            tickets: Arc::new(FileTicketRepository::new(Arc::clone(&store))),
            responses: Arc::new(FileResponseRepository::new(Arc::clone(&store))),
            journal: Arc::new(FileTransitionJournal::new(store)),
        })
    }
}
