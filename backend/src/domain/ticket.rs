//! Ticket data model and its lifecycle states.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::identity_equality;
use super::{AccountId, EntityKind, IdentityKey, Identified, TicketId};

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketState {
    /// Created and waiting for an assignee.
    Open,
    /// Assigned to a technician.
    Assigned,
    /// Resolved; no further transitions.
    Closed,
}

impl TicketState {
    /// Upper-case label matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Assigned => "ASSIGNED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketState {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "ASSIGNED" => Ok(Self::Assigned),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!(
                "unknown ticket state '{other}'; expected OPEN, ASSIGNED or CLOSED"
            )),
        }
    }
}

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Upper-case label matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(format!(
                "unknown priority '{other}'; expected LOW, MEDIUM or HIGH"
            )),
        }
    }
}

/// Support request opened by a client.
///
/// ## Invariants
/// - `assignee` is set exactly when the ticket has left [`TicketState::Open`].
/// - `closed_at` is set exactly when the state is [`TicketState::Closed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    id: TicketId,
    title: String,
    description: String,
    author: AccountId,
    #[serde(default)]
    assignee: Option<AccountId>,
    state: TicketState,
    category: String,
    #[serde(default)]
    priority: Priority,
    created_at: DateTime<Utc>,
    #[serde(default)]
    closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &TicketId {
        &self.id
    }

    /// Short summary.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Full problem description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Client who opened the ticket.
    #[must_use]
    pub const fn author(&self) -> &AccountId {
        &self.author
    }

    /// Technician working on the ticket, if assigned.
    #[must_use]
    pub const fn assignee(&self) -> Option<&AccountId> {
        self.assignee.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TicketState {
        self.state
    }

    /// Free-text category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Urgency.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// When the ticket was opened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the ticket was resolved.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Whether no further transitions apply.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == TicketState::Closed
    }

    /// Whether `technician` is the current assignee.
    #[must_use]
    pub fn is_assigned_to(&self, technician: &AccountId) -> bool {
        self.assignee.as_ref() == Some(technician)
    }

    /// Hand the ticket to `technician`.
    pub fn assign_to(&mut self, technician: AccountId) {
        self.assignee = Some(technician);
        self.state = TicketState::Assigned;
    }

    /// Mark the ticket resolved at `at`.
    pub const fn close(&mut self, at: DateTime<Utc>) {
        self.state = TicketState::Closed;
        self.closed_at = Some(at);
    }
}

impl Identified for Ticket {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(EntityKind::Ticket, self.id.as_str())
    }
}

identity_equality!(Ticket);

/// Input for opening a ticket; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTicket {
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Client opening the ticket.
    pub author: AccountId,
    /// Free-text category.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
    /// Opening time.
    pub created_at: DateTime<Utc>,
}

impl NewTicket {
    /// Attach an issued id; the ticket starts open and unassigned.
    #[must_use]
    pub fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            author: self.author,
            assignee: None,
            state: TicketState::Open,
            category: self.category,
            priority: self.priority,
            created_at: self.created_at,
            closed_at: None,
        }
    }
}

/// Conjunctive ticket filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Category, compared case-insensitively.
    pub category: Option<String>,
    /// Exact state.
    pub state: Option<TicketState>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Opening client.
    pub author: Option<AccountId>,
    /// Assigned technician.
    pub assignee: Option<AccountId>,
}

impl TicketFilter {
    /// Whether `ticket` passes every set criterion.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| ticket.category.to_lowercase() == category.to_lowercase())
            && self.state.is_none_or(|state| ticket.state == state)
            && self
                .priority
                .is_none_or(|priority| ticket.priority == priority)
            && self
                .author
                .as_ref()
                .is_none_or(|author| &ticket.author == author)
            && self
                .assignee
                .as_ref()
                .is_none_or(|assignee| ticket.assignee.as_ref() == Some(assignee))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn opened() -> Ticket {
        let created_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        NewTicket {
            title: "VPN down".to_owned(),
            description: "Cannot reach the office VPN".to_owned(),
            author: AccountId::new("U001"),
            category: "Network".to_owned(),
            priority: Priority::default(),
            created_at,
        }
        .into_ticket(TicketId::new("TK001"))
    }

    #[rstest]
    fn new_ticket_starts_open_unassigned(opened: Ticket) {
        assert_eq!(opened.state(), TicketState::Open);
        assert_eq!(opened.priority(), Priority::Medium);
        assert!(opened.assignee().is_none());
        assert!(opened.closed_at().is_none());
    }

    #[rstest]
    fn assign_then_close(mut opened: Ticket) {
        let tech = AccountId::new("T001");
        opened.assign_to(tech.clone());
        assert!(opened.is_assigned_to(&tech));
        assert_eq!(opened.state(), TicketState::Assigned);

        let at = opened.created_at() + chrono::Duration::hours(2);
        opened.close(at);
        assert!(opened.is_closed());
        assert_eq!(opened.closed_at(), Some(at));
    }

    #[rstest]
    #[case(TicketFilter::default(), true)]
    #[case(TicketFilter { category: Some("network".to_owned()), ..TicketFilter::default() }, true)]
    #[case(TicketFilter { category: Some("Hardware".to_owned()), ..TicketFilter::default() }, false)]
    #[case(TicketFilter { state: Some(TicketState::Open), priority: Some(Priority::Medium), ..TicketFilter::default() }, true)]
    #[case(TicketFilter { assignee: Some(AccountId::new("T001")), ..TicketFilter::default() }, false)]
    #[case(TicketFilter { author: Some(AccountId::new("U001")), ..TicketFilter::default() }, true)]
    fn filter_combines_criteria(opened: Ticket, #[case] filter: TicketFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&opened), expected);
    }

    #[rstest]
    fn serializes_camel_case_with_upper_case_enums(opened: Ticket) {
        let value = serde_json::to_value(&opened).expect("serialize ticket");
        assert_eq!(value["state"], "OPEN");
        assert_eq!(value["priority"], "MEDIUM");
        assert_eq!(value["createdAt"], "2026-03-01T09:00:00Z");
        assert!(value["closedAt"].is_null());
    }

    #[rstest]
    #[case("high", Priority::High)]
    #[case(" Low ", Priority::Low)]
    fn priority_parses_loosely(#[case] raw: &str, #[case] expected: Priority) {
        assert_eq!(raw.parse::<Priority>(), Ok(expected));
    }
}
