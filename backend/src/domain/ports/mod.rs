//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod response_repository;
mod technician_repository;
mod ticket_repository;
mod transition_journal;
mod user_repository;

#[cfg(test)]
pub use response_repository::MockResponseRepository;
pub use response_repository::{ResponsePersistenceError, ResponseRepository};
#[cfg(test)]
pub use technician_repository::MockTechnicianRepository;
pub use technician_repository::{TechnicianPersistenceError, TechnicianRepository};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketPersistenceError, TicketRepository};
#[cfg(test)]
pub use transition_journal::MockTransitionJournal;
pub use transition_journal::{TransitionJournal, TransitionJournalError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
