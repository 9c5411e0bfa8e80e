//! Services wired over the file-backed repositories.

use std::sync::Arc;

use camino::Utf8Path;
use mockable::Clock;
use record_store::StoreError;

use crate::domain::{AccountDirectory, ResponseService, TicketLifecycle};
use crate::outbound::persistence::{
    FileRepositories, FileResponseRepository, FileTechnicianRepository, FileTicketRepository,
    FileTransitionJournal, FileUserRepository,
};

/// Account directory over the file repositories.
pub type FileAccountDirectory = AccountDirectory<FileUserRepository, FileTechnicianRepository>;
/// Ticket lifecycle over the file repositories.
pub type FileTicketLifecycle =
    TicketLifecycle<FileTicketRepository, FileTechnicianRepository, FileTransitionJournal>;
/// Response service over the file repositories.
pub type FileResponseService = ResponseService<FileResponseRepository, FileTicketRepository>;

/// Every service of the tracker sharing one data directory.
#[derive(Clone)]
pub struct Desk {
    /// Registration, login and account edits.
    pub accounts: FileAccountDirectory,
    /// Ticket creation and transitions.
    pub tickets: FileTicketLifecycle,
    /// Ticket responses.
    pub responses: FileResponseService,
}

impl Desk {
    /// Open `data_dir` and wire the services with `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the directory cannot be created or
    /// opened.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use camino::Utf8Path;
    /// use mockable::DefaultClock;
    /// use ticketdesk::Desk;
    ///
    /// let scratch = tempfile::tempdir().expect("temp dir");
    /// let root = Utf8Path::from_path(scratch.path()).expect("utf-8 path");
    /// let desk = Desk::open(root, Arc::new(DefaultClock)).expect("open desk");
    /// assert!(desk.accounts.technicians().is_empty());
    /// ```
    pub fn open(data_dir: &Utf8Path, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let repos = FileRepositories::open(data_dir)?;
        Ok(Self::from_repositories(&repos, clock))
    }

    /// Wire the services over already opened repositories.
    #[must_use]
    pub fn from_repositories(repos: &FileRepositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: AccountDirectory::new(
                Arc::clone(&repos.users),
                Arc::clone(&repos.technicians),
            ),
            tickets: TicketLifecycle::new(
                Arc::clone(&repos.tickets),
                Arc::clone(&repos.technicians),
                Arc::clone(&repos.journal),
                Arc::clone(&clock),
            ),
            responses: ResponseService::new(
                Arc::clone(&repos.responses),
                Arc::clone(&repos.tickets),
                clock,
            ),
        }
    }
}
