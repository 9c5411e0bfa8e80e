//! Port for the write-ahead journal guarding two-record transitions.

use crate::domain::TransitionIntent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by transition journal adapters.
    pub enum TransitionJournalError {
        /// The journal could not be written.
        Write { message: String } => "transition journal write failed: {message}",
    }
}

/// Port holding at most one pending [`TransitionIntent`].
#[cfg_attr(test, mockall::automock)]
pub trait TransitionJournal: Send + Sync {
    /// The intent left by an unfinished transition, if any.
    fn pending(&self) -> Option<TransitionIntent>;

    /// Persist `intent`, replacing any earlier one.
    fn record(&self, intent: &TransitionIntent) -> Result<(), TransitionJournalError>;

    /// Forget the pending intent.
    fn clear(&self) -> Result<(), TransitionJournalError>;
}
