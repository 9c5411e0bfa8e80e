//! File-backed [`TicketRepository`].

use std::sync::Arc;

use record_store::{Collection, EntityStore, Record, StoreError};

use super::TICKETS_FILE;
use crate::domain::ports::{TicketPersistenceError, TicketRepository};
use crate::domain::{
    AccountId, NewTicket, Priority, Ticket, TicketFilter, TicketId, TicketState,
};

const TICKET_PREFIX: &str = "TK";

impl Record for Ticket {
    fn record_id(&self) -> &str {
        self.id().as_str()
    }
}

fn map_store_error(error: StoreError) -> TicketPersistenceError {
    TicketPersistenceError::write(error.to_string())
}

/// Tickets stored in `tickets.json`.
#[derive(Debug, Clone)]
pub struct FileTicketRepository {
    tickets: Collection<Ticket>,
}

impl FileTicketRepository {
    /// Bind the repository to `store`.
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            tickets: Collection::new(store, TICKETS_FILE),
        }
    }
}

impl TicketRepository for FileTicketRepository {
    fn find_all(&self) -> Vec<Ticket> {
        self.tickets.find_all()
    }

    fn find_by_id(&self, id: &TicketId) -> Option<Ticket> {
        self.tickets.find_by_id(id.as_str())
    }

    fn find_by_category(&self, category: &str) -> Vec<Ticket> {
        self.find_matching(&TicketFilter {
            category: Some(category.to_owned()),
            ..TicketFilter::default()
        })
    }

    fn find_by_state(&self, state: TicketState) -> Vec<Ticket> {
        self.tickets.find_where(|ticket| ticket.state() == state)
    }

    fn find_by_priority(&self, priority: Priority) -> Vec<Ticket> {
        self.tickets
            .find_where(|ticket| ticket.priority() == priority)
    }

    fn find_by_author(&self, author: &AccountId) -> Vec<Ticket> {
        self.tickets.find_where(|ticket| ticket.author() == author)
    }

    fn find_by_assignee(&self, assignee: &AccountId) -> Vec<Ticket> {
        self.tickets
            .find_where(|ticket| ticket.is_assigned_to(assignee))
    }

    fn find_matching(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.tickets.find_where(|ticket| filter.matches(ticket))
    }

    fn create(&self, ticket: NewTicket) -> Result<Ticket, TicketPersistenceError> {
        self.tickets
            .create(TICKET_PREFIX, |id| ticket.into_ticket(TicketId::new(id)))
            .map_err(map_store_error)
    }

    fn update(&self, ticket: &Ticket) -> Result<Option<Ticket>, TicketPersistenceError> {
        self.tickets.update(ticket.clone()).map_err(map_store_error)
    }

    fn delete(&self, id: &TicketId) -> Result<bool, TicketPersistenceError> {
        self.tickets.delete(id.as_str()).map_err(map_store_error)
    }
}
