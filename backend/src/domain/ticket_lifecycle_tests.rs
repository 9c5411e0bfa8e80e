//! Tests for the ticket lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockall::Sequence;
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockTechnicianRepository, MockTicketRepository, MockTransitionJournal,
    TechnicianPersistenceError, TicketPersistenceError, TransitionJournalError,
};
use crate::domain::{ErrorCode, Technician, TechnicianProfile, User};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

type Lifecycle =
    TicketLifecycle<MockTicketRepository, MockTechnicianRepository, MockTransitionJournal>;

fn lifecycle(
    tickets: MockTicketRepository,
    technicians: MockTechnicianRepository,
    journal: MockTransitionJournal,
) -> Lifecycle {
    TicketLifecycle::new(
        Arc::new(tickets),
        Arc::new(technicians),
        Arc::new(journal),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    )
}

fn member(id: &str, role: Role) -> Account {
    Account::Member(User::new(AccountId::new(id), "Member", "m@desk.io", "pw", role))
}

fn tech_account(id: &str) -> Account {
    Account::Technician(tech(id, 1))
}

fn tech(id: &str, workload: u32) -> Technician {
    let mut technician = Technician::new(
        AccountId::new(id),
        "Tess",
        format!("{}@desk.io", id.to_lowercase()),
        "pw",
        TechnicianProfile::new("Network"),
    );
    for _ in 0..workload {
        technician.increment_workload();
    }
    technician
}

fn open_ticket() -> Ticket {
    NewTicket {
        title: "VPN down".to_owned(),
        description: "No tunnel".to_owned(),
        author: AccountId::new("U001"),
        category: "Network".to_owned(),
        priority: Priority::High,
        created_at: fixture_timestamp(),
    }
    .into_ticket(TicketId::new("TK001"))
}

fn assigned_ticket(technician: &str) -> Ticket {
    let mut ticket = open_ticket();
    ticket.assign_to(AccountId::new(technician));
    ticket
}

#[fixture]
fn draft() -> TicketDraft {
    TicketDraft {
        title: "VPN down".to_owned(),
        description: "No tunnel".to_owned(),
        category: "Network".to_owned(),
        priority: Priority::Medium,
    }
}

#[fixture]
fn quiet_journal() -> MockTransitionJournal {
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal.expect_record().times(0);
    journal
}

#[rstest]
fn create_stamps_author_and_clock(draft: TicketDraft, quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_create()
        .withf(|new_ticket| {
            new_ticket.author.as_str() == "U001" && new_ticket.created_at == fixture_timestamp()
        })
        .times(1)
        .returning(|new_ticket| Ok(new_ticket.into_ticket(TicketId::new("TK001"))));

    let ticket = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .create(&member("U001", Role::Client), draft)
        .expect("create succeeds");

    assert_eq!(ticket.id().as_str(), "TK001");
    assert_eq!(ticket.state(), TicketState::Open);
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Tech)]
fn create_rejects_non_clients(
    draft: TicketDraft,
    quiet_journal: MockTransitionJournal,
    #[case] role: Role,
) {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_create().times(0);

    let err = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .create(&member("A001", role), draft)
        .expect_err("only clients create");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn create_rejects_blank_category(mut draft: TicketDraft, quiet_journal: MockTransitionJournal) {
    draft.category = "  ".to_owned();
    let mut tickets = MockTicketRepository::new();
    tickets.expect_create().times(0);

    let err = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .create(&member("U001", Role::Client), draft)
        .expect_err("blank category");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn create_wraps_write_failure(draft: TicketDraft, quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_create()
        .returning(|_| Err(TicketPersistenceError::write("disk full")));

    let err = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .create(&member("U001", Role::Client), draft)
        .expect_err("write fails");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
    assert!(err.message().contains("creating the ticket"));
    assert!(err.message().contains("disk full"));
}

#[rstest]
fn assign_journals_then_writes_ticket_then_technician() {
    let mut seq = Sequence::new();
    let mut tickets = MockTicketRepository::new();
    let mut technicians = MockTechnicianRepository::new();
    let mut journal = MockTransitionJournal::new();

    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    journal
        .expect_pending()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| None);
    journal
        .expect_record()
        .withf(|intent| {
            intent.kind == TransitionKind::Assign
                && intent.technician.workload() == 1
                && intent.ticket.state() == TicketState::Assigned
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    tickets
        .expect_update()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|ticket| Ok(Some(ticket.clone())));
    technicians
        .expect_update()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|technician| Ok(Some(technician.clone())));
    journal
        .expect_clear()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let ticket = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T002"),
        )
        .expect("assign succeeds");

    assert_eq!(ticket.state(), TicketState::Assigned);
    assert!(ticket.is_assigned_to(&AccountId::new("T002")));
}

#[rstest]
fn assign_requires_admin(quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_find_by_id().times(0);

    let err = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .assign(
            &member("U001", Role::Client),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn assign_non_open_ticket_conflicts_without_writes(quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(assigned_ticket("T001")));
    tickets.expect_update().times(0);
    let mut technicians = MockTechnicianRepository::new();
    technicians.expect_find_by_id().times(0);
    technicians.expect_update().times(0);

    let err = lifecycle(tickets, technicians, quiet_journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T002"),
        )
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(None, Some(0))]
#[case(Some(()), None)]
fn assign_unknown_records_are_not_found(
    quiet_journal: MockTransitionJournal,
    #[case] ticket: Option<()>,
    #[case] technician: Option<u32>,
) {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(move |_| ticket.map(|()| open_ticket()));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(move |id| technician.map(|load| tech(id.as_str(), load)));

    let err = lifecycle(tickets, technicians, quiet_journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK404"),
            &AccountId::new("T404"),
        )
        .expect_err("not found");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
fn assign_discards_intent_when_ticket_write_fails() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    tickets
        .expect_update()
        .returning(|_| Err(TicketPersistenceError::write("read-only")));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    technicians.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal.expect_record().times(1).returning(|_| Ok(()));
    journal.expect_clear().times(1).returning(|| Ok(()));

    let err = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect_err("write fails");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
    assert!(err.message().contains("assigning the ticket"));
}

#[rstest]
fn assign_reports_intent_still_pending_when_discard_fails() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    tickets
        .expect_update()
        .returning(|_| Err(TicketPersistenceError::write("disk full")));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    technicians.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal.expect_record().times(1).returning(|_| Ok(()));
    journal
        .expect_clear()
        .times(1)
        .returning(|| Err(TransitionJournalError::write("disk full")));

    let err = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect_err("write fails");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
    assert!(err.message().contains("assigning the ticket"));
    assert!(err.message().contains("still pending"));
}

#[rstest]
fn assign_rolls_forward_pending_intent_before_recording() {
    let mut seq = Sequence::new();
    let mut tickets = MockTicketRepository::new();
    let mut technicians = MockTechnicianRepository::new();
    let mut journal = MockTransitionJournal::new();

    journal
        .expect_pending()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| {
            let mut earlier = assigned_ticket("T001");
            earlier.close(fixture_timestamp());
            Some(TransitionIntent {
                kind: TransitionKind::Resolve,
                ticket: earlier,
                technician: tech("T001", 1),
                recorded_at: fixture_timestamp(),
            })
        });
    tickets
        .expect_update()
        .withf(Ticket::is_closed)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|ticket| Ok(Some(ticket.clone())));
    technicians
        .expect_update()
        .withf(|technician| technician.workload() == 1)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|technician| Ok(Some(technician.clone())));
    journal
        .expect_clear()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 1)));
    journal
        .expect_record()
        .withf(|intent| intent.technician.workload() == 2)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    tickets
        .expect_update()
        .withf(|ticket| ticket.state() == TicketState::Assigned)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|ticket| Ok(Some(ticket.clone())));
    technicians
        .expect_update()
        .withf(|technician| technician.workload() == 2)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|technician| Ok(Some(technician.clone())));
    journal
        .expect_clear()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let ticket = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect("assign succeeds");

    assert_eq!(ticket.state(), TicketState::Assigned);
}

#[rstest]
fn assign_refuses_while_pending_intent_cannot_be_replayed() {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_find_by_id().times(0);
    tickets
        .expect_update()
        .times(1)
        .returning(|_| Err(TicketPersistenceError::write("read-only")));
    let mut technicians = MockTechnicianRepository::new();
    technicians.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| {
        Some(TransitionIntent {
            kind: TransitionKind::Assign,
            ticket: assigned_ticket("T001"),
            technician: tech("T001", 1),
            recorded_at: fixture_timestamp(),
        })
    });
    journal.expect_record().times(0);
    journal.expect_clear().times(0);

    let err = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK002"),
            &AccountId::new("T002"),
        )
        .expect_err("earlier intent blocks");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
    assert!(err.message().contains("still pending"));
}

#[rstest]
fn assign_keeps_intent_when_technician_write_fails() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    tickets
        .expect_update()
        .returning(|ticket| Ok(Some(ticket.clone())));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    technicians
        .expect_update()
        .returning(|_| Err(TechnicianPersistenceError::write("read-only")));
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal.expect_record().times(1).returning(|_| Ok(()));
    journal.expect_clear().times(0);

    let err = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect_err("second write fails");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
    assert!(err.message().contains("next startup"));
}

#[rstest]
fn assign_fails_cleanly_when_journal_unwritable() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(open_ticket()));
    tickets.expect_update().times(0);
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    technicians.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal
        .expect_record()
        .returning(|_| Err(TransitionJournalError::write("no space")));

    let err = lifecycle(tickets, technicians, journal)
        .assign(
            &member("A001", Role::Admin),
            &TicketId::new("TK001"),
            &AccountId::new("T001"),
        )
        .expect_err("journal fails");

    assert_eq!(err.code(), ErrorCode::PersistenceFailure);
}

#[rstest]
fn resolve_by_non_assignee_is_forbidden(quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(assigned_ticket("T001")));
    tickets.expect_update().times(0);
    let mut technicians = MockTechnicianRepository::new();
    technicians.expect_update().times(0);

    let err = lifecycle(tickets, technicians, quiet_journal)
        .resolve(&tech_account("T002"), &TicketId::new("TK001"))
        .expect_err("not the assignee");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn resolve_closed_ticket_conflicts(quiet_journal: MockTransitionJournal) {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_find_by_id().returning(|_| {
        let mut ticket = assigned_ticket("T001");
        ticket.close(fixture_timestamp());
        Some(ticket)
    });

    let err = lifecycle(tickets, MockTechnicianRepository::new(), quiet_journal)
        .resolve(&tech_account("T001"), &TicketId::new("TK001"))
        .expect_err("already closed");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
fn resolve_closes_and_floors_workload() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_find_by_id()
        .returning(|_| Some(assigned_ticket("T001")));
    tickets
        .expect_update()
        .returning(|ticket| Ok(Some(ticket.clone())));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_find_by_id()
        .returning(|id| Some(tech(id.as_str(), 0)));
    technicians
        .expect_update()
        .withf(|technician| technician.workload() == 0)
        .times(1)
        .returning(|technician| Ok(Some(technician.clone())));
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal
        .expect_record()
        .withf(|intent| intent.kind == TransitionKind::Resolve)
        .returning(|_| Ok(()));
    journal.expect_clear().returning(|| Ok(()));

    let ticket = lifecycle(tickets, technicians, journal)
        .resolve(&tech_account("T001"), &TicketId::new("TK001"))
        .expect("resolve succeeds");

    assert!(ticket.is_closed());
    assert_eq!(ticket.closed_at(), Some(fixture_timestamp()));
}

#[rstest]
fn replay_writes_post_images_and_clears() {
    let mut tickets = MockTicketRepository::new();
    tickets
        .expect_update()
        .withf(|ticket| ticket.state() == TicketState::Assigned)
        .times(1)
        .returning(|ticket| Ok(Some(ticket.clone())));
    let mut technicians = MockTechnicianRepository::new();
    technicians
        .expect_update()
        .withf(|technician| technician.workload() == 1)
        .times(1)
        .returning(|technician| Ok(Some(technician.clone())));
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| {
        Some(TransitionIntent {
            kind: TransitionKind::Assign,
            ticket: assigned_ticket("T001"),
            technician: tech("T001", 1),
            recorded_at: fixture_timestamp(),
        })
    });
    journal.expect_clear().times(1).returning(|| Ok(()));

    let replayed = lifecycle(tickets, technicians, journal)
        .replay_pending()
        .expect("replay succeeds")
        .expect("an intent was pending");

    assert_eq!(replayed.kind, TransitionKind::Assign);
}

#[rstest]
fn replay_drops_intent_for_vanished_ticket() {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_update().times(1).returning(|_| Ok(None));
    let mut technicians = MockTechnicianRepository::new();
    technicians.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| {
        Some(TransitionIntent {
            kind: TransitionKind::Assign,
            ticket: assigned_ticket("T001"),
            technician: tech("T001", 1),
            recorded_at: fixture_timestamp(),
        })
    });
    journal.expect_clear().times(1).returning(|| Ok(()));

    let replayed = lifecycle(tickets, technicians, journal)
        .replay_pending()
        .expect("replay succeeds");

    assert!(replayed.is_some());
}

#[rstest]
fn replay_without_pending_intent_is_a_no_op() {
    let mut tickets = MockTicketRepository::new();
    tickets.expect_update().times(0);
    let mut journal = MockTransitionJournal::new();
    journal.expect_pending().returning(|| None);
    journal.expect_clear().times(0);

    let replayed = lifecycle(tickets, MockTechnicianRepository::new(), journal)
        .replay_pending()
        .expect("replay succeeds");

    assert!(replayed.is_none());
}
