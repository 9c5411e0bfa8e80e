//! Responses on tickets.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ResponseRepository, TicketRepository};
use crate::domain::{Account, DomainError, DomainResult, NewResponse, Response, TicketId};

/// Adds responses to open tickets and lists them in posting order.
pub struct ResponseService<R, K> {
    responses: Arc<R>,
    tickets: Arc<K>,
    clock: Arc<dyn Clock>,
}

impl<R, K> Clone for ResponseService<R, K> {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            tickets: Arc::clone(&self.tickets),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, K> ResponseService<R, K>
where
    R: ResponseRepository,
    K: TicketRepository,
{
    /// Create the service over its repositories and clock.
    pub const fn new(responses: Arc<R>, tickets: Arc<K>, clock: Arc<dyn Clock>) -> Self {
        Self {
            responses,
            tickets,
            clock,
        }
    }

    /// Post `content` on `ticket_id` as `author`. Any role may respond.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for blank content, `NotFound` for an unknown ticket,
    /// `Conflict` when the ticket is closed, `PersistenceFailure` when the
    /// write fails.
    pub fn add_response(
        &self,
        author: &Account,
        ticket_id: &TicketId,
        content: &str,
    ) -> DomainResult<Response> {
        if content.trim().is_empty() {
            return Err(DomainError::invalid_request(
                "response content must not be empty",
            ));
        }
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .ok_or_else(|| DomainError::not_found(format!("no ticket with id {ticket_id}")))?;
        if ticket.is_closed() {
            return Err(DomainError::conflict(format!(
                "ticket {ticket_id} is closed and accepts no responses"
            )));
        }

        let response = self
            .responses
            .create(NewResponse {
                ticket_id: ticket_id.clone(),
                author: author.id().clone(),
                content: content.to_owned(),
                created_at: self.clock.utc(),
            })
            .map_err(|err| {
                DomainError::persistence(format!(
                    "persistence failure while saving the response: {err}"
                ))
            })?;
        info!(
            response = %response.id(),
            ticket = %ticket_id,
            author = %author.id(),
            "response added"
        );
        Ok(response)
    }

    /// Responses on `ticket_id`, oldest first. Equal timestamps keep stored
    /// order.
    #[must_use]
    pub fn responses_for_ticket(&self, ticket_id: &TicketId) -> Vec<Response> {
        let mut responses = self.responses.find_by_ticket(ticket_id);
        responses.sort_by_key(Response::created_at);
        responses
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use rstest::rstest;

    use crate::domain::ports::{
        MockResponseRepository, MockTicketRepository, ResponsePersistenceError,
    };
    use crate::domain::{
        AccountId, ErrorCode, NewTicket, Priority, ResponseId, Role, Ticket, User,
    };

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(minutes)
    }

    fn ticket(closed: bool) -> Ticket {
        let mut ticket = NewTicket {
            title: "Printer".to_owned(),
            description: "Jammed".to_owned(),
            author: AccountId::new("U001"),
            category: "Hardware".to_owned(),
            priority: Priority::Low,
            created_at: at(0),
        }
        .into_ticket(TicketId::new("TK001"));
        if closed {
            ticket.assign_to(AccountId::new("T001"));
            ticket.close(at(5));
        }
        ticket
    }

    fn response(id: &str, minutes: i64) -> Response {
        NewResponse {
            ticket_id: TicketId::new("TK001"),
            author: AccountId::new("U001"),
            content: format!("note {id}"),
            created_at: at(minutes),
        }
        .into_response(ResponseId::new(id))
    }

    fn author() -> Account {
        Account::Member(User::new(AccountId::new("U001"), "Cleo", "c@desk.io", "pw", Role::Client))
    }

    fn service(
        responses: MockResponseRepository,
        tickets: MockTicketRepository,
    ) -> ResponseService<MockResponseRepository, MockTicketRepository> {
        ResponseService::new(Arc::new(responses), Arc::new(tickets), Arc::new(FixtureClock(at(30))))
    }

    #[rstest]
    fn add_response_stamps_clock() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_find_by_id().returning(|_| Some(ticket(false)));
        let mut responses = MockResponseRepository::new();
        responses
            .expect_create()
            .withf(|new_response| new_response.created_at == at(30))
            .times(1)
            .returning(|new_response| Ok(new_response.into_response(ResponseId::new("R001"))));

        let created = service(responses, tickets)
            .add_response(&author(), &TicketId::new("TK001"), "Tried turning it off")
            .expect("response added");

        assert_eq!(created.id().as_str(), "R001");
        assert_eq!(created.author().as_str(), "U001");
    }

    #[rstest]
    #[case(true, "hello", ErrorCode::Conflict)]
    #[case(false, "   ", ErrorCode::InvalidRequest)]
    fn add_response_guards(#[case] closed: bool, #[case] content: &str, #[case] code: ErrorCode) {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_find_by_id().returning(move |_| Some(ticket(closed)));
        let mut responses = MockResponseRepository::new();
        responses.expect_create().times(0);

        let err = service(responses, tickets)
            .add_response(&author(), &TicketId::new("TK001"), content)
            .expect_err("guard rejects");

        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn add_response_to_unknown_ticket_is_not_found() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_find_by_id().returning(|_| None);

        let err = service(MockResponseRepository::new(), tickets)
            .add_response(&author(), &TicketId::new("TK404"), "hello")
            .expect_err("unknown ticket");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn add_response_wraps_write_failure() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_find_by_id().returning(|_| Some(ticket(false)));
        let mut responses = MockResponseRepository::new();
        responses
            .expect_create()
            .returning(|_| Err(ResponsePersistenceError::write("disk full")));

        let err = service(responses, tickets)
            .add_response(&author(), &TicketId::new("TK001"), "hello")
            .expect_err("write fails");

        assert_eq!(err.code(), ErrorCode::PersistenceFailure);
        assert!(err.message().contains("disk full"));
    }

    #[rstest]
    fn responses_come_back_oldest_first() {
        let mut responses = MockResponseRepository::new();
        responses
            .expect_find_by_ticket()
            .returning(|_| vec![response("R003", 20), response("R001", 5), response("R002", 10)]);

        let listed = service(responses, MockTicketRepository::new())
            .responses_for_ticket(&TicketId::new("TK001"));

        let ids: Vec<_> = listed.iter().map(|r| r.id().as_str().to_owned()).collect();
        assert_eq!(ids, ["R001", "R002", "R003"]);
    }
}
