//! Ticket lifecycle service: create, assign and resolve.
//!
//! Assign and resolve each rewrite a ticket and a technician. The two files
//! cannot be replaced together, so the service journals the post-images of
//! both records first and clears the journal once both writes land. A
//! journal entry found at startup, or before the next assign or resolve, is
//! rolled forward by [`TicketLifecycle::replay_pending`].

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{TechnicianRepository, TicketRepository, TransitionJournal};
use crate::domain::{
    Account, AccountId, DomainError, DomainResult, NewTicket, Priority, Role, Ticket,
    TicketFilter, TicketId, TicketState, TransitionIntent, TransitionKind,
};

/// Client-supplied fields for a new ticket.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Free-text category.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
}

/// Role-gated ticket transitions keeping technician workload in step.
pub struct TicketLifecycle<K, T, J> {
    tickets: Arc<K>,
    technicians: Arc<T>,
    journal: Arc<J>,
    clock: Arc<dyn Clock>,
}

impl<K, T, J> Clone for TicketLifecycle<K, T, J> {
    fn clone(&self) -> Self {
        Self {
            tickets: Arc::clone(&self.tickets),
            technicians: Arc::clone(&self.technicians),
            journal: Arc::clone(&self.journal),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, T, J> TicketLifecycle<K, T, J>
where
    K: TicketRepository,
    T: TechnicianRepository,
    J: TransitionJournal,
{
    /// Create the service over its repositories, journal and clock.
    pub const fn new(
        tickets: Arc<K>,
        technicians: Arc<T>,
        journal: Arc<J>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            technicians,
            journal,
            clock,
        }
    }

    /// Open a ticket on behalf of a client.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless `actor` is a client, `InvalidRequest` for a blank
    /// title, description or category, `PersistenceFailure` when the write
    /// fails.
    pub fn create(&self, actor: &Account, draft: TicketDraft) -> DomainResult<Ticket> {
        if actor.role() != Role::Client {
            return Err(DomainError::forbidden("only clients can create tickets"));
        }
        for (field, value) in [
            ("title", &draft.title),
            ("description", &draft.description),
            ("category", &draft.category),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::invalid_request(format!(
                    "ticket {field} must not be empty"
                )));
            }
        }

        let ticket = self
            .tickets
            .create(NewTicket {
                title: draft.title.trim().to_owned(),
                description: draft.description.trim().to_owned(),
                author: actor.id().clone(),
                category: draft.category.trim().to_owned(),
                priority: draft.priority,
                created_at: self.clock.utc(),
            })
            .map_err(|err| {
                DomainError::persistence(format!(
                    "persistence failure while creating the ticket: {err}"
                ))
            })?;
        info!(ticket = %ticket.id(), author = %actor.id(), "ticket created");
        Ok(ticket)
    }

    /// Hand an open ticket to a technician and raise their workload.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless `actor` is an administrator, `NotFound` for an
    /// unknown ticket or technician, `Conflict` when the ticket is not open,
    /// `PersistenceFailure` when a write fails or an earlier transition
    /// cannot be rolled forward.
    pub fn assign(
        &self,
        actor: &Account,
        ticket_id: &TicketId,
        technician_id: &AccountId,
    ) -> DomainResult<Ticket> {
        if actor.role() != Role::Admin {
            return Err(DomainError::forbidden(
                "only administrators can assign tickets",
            ));
        }
        self.settle_pending()?;
        let mut ticket = self.load_ticket(ticket_id)?;
        if ticket.state() != TicketState::Open {
            return Err(DomainError::conflict(format!(
                "ticket {ticket_id} cannot be assigned because its state is {}",
                ticket.state()
            )));
        }
        let mut technician = self.technicians.find_by_id(technician_id).ok_or_else(|| {
            DomainError::not_found(format!("no technician with id {technician_id}"))
        })?;

        ticket.assign_to(technician.id().clone());
        technician.increment_workload();

        let intent = TransitionIntent {
            kind: TransitionKind::Assign,
            ticket,
            technician,
            recorded_at: self.clock.utc(),
        };
        let ticket = self.commit(intent)?;
        info!(ticket = %ticket_id, technician = %technician_id, "ticket assigned");
        Ok(ticket)
    }

    /// Close a ticket on behalf of its assignee and lower their workload.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless `actor` is the assigned technician, `NotFound` for
    /// an unknown ticket or a missing technician record, `Conflict` when the
    /// ticket is already closed, `PersistenceFailure` when a write fails or
    /// an earlier transition cannot be rolled forward.
    pub fn resolve(&self, actor: &Account, ticket_id: &TicketId) -> DomainResult<Ticket> {
        if actor.role() != Role::Tech {
            return Err(DomainError::forbidden("only technicians can resolve tickets"));
        }
        self.settle_pending()?;
        let mut ticket = self.load_ticket(ticket_id)?;
        if !ticket.is_assigned_to(actor.id()) {
            return Err(DomainError::forbidden(format!(
                "ticket {ticket_id} is not assigned to {}",
                actor.id()
            )));
        }
        if ticket.is_closed() {
            return Err(DomainError::conflict(format!(
                "ticket {ticket_id} is already closed"
            )));
        }
        let mut technician = self.technicians.find_by_id(actor.id()).ok_or_else(|| {
            DomainError::not_found(format!("assigned technician {} not found", actor.id()))
        })?;

        let now = self.clock.utc();
        ticket.close(now);
        technician.decrement_workload();

        let intent = TransitionIntent {
            kind: TransitionKind::Resolve,
            ticket,
            technician,
            recorded_at: now,
        };
        let ticket = self.commit(intent)?;
        info!(ticket = %ticket_id, technician = %actor.id(), "ticket resolved");
        Ok(ticket)
    }

    /// The ticket with `id`, if any.
    #[must_use]
    pub fn find(&self, id: &TicketId) -> Option<Ticket> {
        self.tickets.find_by_id(id)
    }

    /// Tickets opened by `author`.
    #[must_use]
    pub fn tickets_by_author(&self, author: &AccountId) -> Vec<Ticket> {
        self.tickets.find_by_author(author)
    }

    /// Tickets assigned to `technician`.
    #[must_use]
    pub fn tickets_by_assignee(&self, technician: &AccountId) -> Vec<Ticket> {
        self.tickets.find_by_assignee(technician)
    }

    /// Tickets passing `filter`.
    #[must_use]
    pub fn list(&self, filter: &TicketFilter) -> Vec<Ticket> {
        self.tickets.find_matching(filter)
    }

    /// Finish a transition interrupted between its two writes.
    ///
    /// Returns the replayed intent, or `None` when the journal was empty. A
    /// ticket that no longer exists drops the intent without touching the
    /// technician.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` when a post-image or the journal cannot be
    /// written; the intent is then kept for the next attempt.
    pub fn replay_pending(&self) -> DomainResult<Option<TransitionIntent>> {
        let Some(intent) = self.journal.pending() else {
            return Ok(None);
        };
        warn!(
            kind = ?intent.kind,
            ticket = %intent.ticket.id(),
            technician = %intent.technician.id(),
            recorded_at = %intent.recorded_at,
            "replaying unfinished ticket transition"
        );
        let stored = self.tickets.update(&intent.ticket).map_err(|err| {
            DomainError::persistence(format!(
                "persistence failure while replaying the ticket: {err}"
            ))
        })?;
        if stored.is_some() {
            self.technicians
                .update(&intent.technician)
                .map_err(|err| {
                    DomainError::persistence(format!(
                        "persistence failure while replaying the technician: {err}"
                    ))
                })?;
        } else {
            warn!(
                ticket = %intent.ticket.id(),
                "ticket vanished before replay; transition dropped"
            );
        }
        self.journal.clear().map_err(|err| {
            DomainError::persistence(format!(
                "persistence failure while clearing the journal: {err}"
            ))
        })?;
        Ok(Some(intent))
    }

    /// Roll forward any earlier intent before a new one is recorded.
    fn settle_pending(&self) -> DomainResult<()> {
        self.replay_pending().map(|_| ()).map_err(|err| {
            DomainError::persistence(format!(
                "an earlier ticket transition is still pending: {}",
                err.message()
            ))
        })
    }

    fn load_ticket(&self, id: &TicketId) -> DomainResult<Ticket> {
        self.tickets
            .find_by_id(id)
            .ok_or_else(|| DomainError::not_found(format!("no ticket with id {id}")))
    }

    /// Journal, write the ticket, write the technician, clear the journal.
    fn commit(&self, intent: TransitionIntent) -> DomainResult<Ticket> {
        let operation = match intent.kind {
            TransitionKind::Assign => "assigning",
            TransitionKind::Resolve => "resolving",
        };
        self.journal.record(&intent).map_err(|err| {
            DomainError::persistence(format!(
                "persistence failure while {operation} the ticket: {err}"
            ))
        })?;

        let stored = match self.tickets.update(&intent.ticket) {
            Ok(stored) => stored,
            Err(err) => {
                return Err(self.discard_intent(DomainError::persistence(format!(
                    "persistence failure while {operation} the ticket: {err}"
                ))));
            }
        };
        let Some(ticket) = stored else {
            return Err(self.discard_intent(DomainError::not_found(format!(
                "no ticket with id {}",
                intent.ticket.id()
            ))));
        };

        match self.technicians.update(&intent.technician) {
            Ok(Some(_)) => {}
            Ok(None) => warn!(
                technician = %intent.technician.id(),
                "technician vanished during transition; workload not stored"
            ),
            Err(err) => {
                return Err(DomainError::persistence(format!(
                    "persistence failure while {operation} the ticket: {err}; \
                     the transition will be completed at next startup"
                )));
            }
        }

        if let Err(err) = self.journal.clear() {
            warn!(error = %err, "transition committed but journal not cleared");
        }
        Ok(ticket)
    }

    /// Drop the recorded intent and hand back `failure`, or a persistence
    /// error naming the surviving intent when the journal cannot be cleared.
    fn discard_intent(&self, failure: DomainError) -> DomainError {
        match self.journal.clear() {
            Ok(()) => failure,
            Err(err) => {
                warn!(error = %err, "failed to discard transition intent");
                DomainError::persistence(format!(
                    "{}; the transition intent could not be discarded ({err}) and is still \
                     pending, so it will be completed at next startup",
                    failure.message()
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "ticket_lifecycle_tests.rs"]
mod tests;
