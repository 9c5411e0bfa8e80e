//! Port abstraction for tickets.

use crate::domain::{AccountId, NewTicket, Priority, Ticket, TicketFilter, TicketId, TicketState};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketPersistenceError {
        /// The ticket collection could not be written.
        Write { message: String } => "ticket repository write failed: {message}",
    }
}

/// Port for reading and writing tickets.
///
/// Every lookup is a full scan in stored order.
#[cfg_attr(test, mockall::automock)]
pub trait TicketRepository: Send + Sync {
    /// Every ticket in stored order.
    fn find_all(&self) -> Vec<Ticket>;

    /// The ticket with `id`, if any.
    fn find_by_id(&self, id: &TicketId) -> Option<Ticket>;

    /// Tickets in `category`, ignoring case.
    fn find_by_category(&self, category: &str) -> Vec<Ticket>;

    /// Tickets in `state`.
    fn find_by_state(&self, state: TicketState) -> Vec<Ticket>;

    /// Tickets with `priority`.
    fn find_by_priority(&self, priority: Priority) -> Vec<Ticket>;

    /// Tickets opened by `author`.
    fn find_by_author(&self, author: &AccountId) -> Vec<Ticket>;

    /// Tickets assigned to `assignee`.
    fn find_by_assignee(&self, assignee: &AccountId) -> Vec<Ticket>;

    /// Tickets passing every criterion of `filter`.
    fn find_matching(&self, filter: &TicketFilter) -> Vec<Ticket>;

    /// Store a new ticket under a fresh `TK` id.
    fn create(&self, ticket: NewTicket) -> Result<Ticket, TicketPersistenceError>;

    /// Replace the stored ticket with the same id.
    fn update(&self, ticket: &Ticket) -> Result<Option<Ticket>, TicketPersistenceError>;

    /// Remove the ticket with `id`, reporting whether one was removed.
    fn delete(&self, id: &TicketId) -> Result<bool, TicketPersistenceError>;
}
