//! Responses posted on tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::identity_equality;
use super::{AccountId, EntityKind, IdentityKey, Identified, ResponseId, TicketId};

/// Characters shown by [`Response::preview`] before truncation.
pub const PREVIEW_CHARS: usize = 50;

/// Message added to a ticket by any participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    id: ResponseId,
    ticket_id: TicketId,
    author: AccountId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Response {
    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &ResponseId {
        &self.id
    }

    /// Ticket the response belongs to.
    #[must_use]
    pub const fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    /// Account that wrote it.
    #[must_use]
    pub const fn author(&self) -> &AccountId {
        &self.author
    }

    /// Full text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// When it was posted.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Content cut to `max` characters, with `...` appended when cut.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use ticketdesk::domain::{AccountId, NewResponse, ResponseId, TicketId};
    ///
    /// let response = NewResponse {
    ///     ticket_id: TicketId::new("TK001"),
    ///     author: AccountId::new("U001"),
    ///     content: "Rebooted the router".to_owned(),
    ///     created_at: Utc::now(),
    /// }
    /// .into_response(ResponseId::new("R001"));
    /// assert_eq!(response.preview(8), "Rebooted...");
    /// assert_eq!(response.preview(100), "Rebooted the router");
    /// ```
    #[must_use]
    pub fn preview(&self, max: usize) -> String {
        if self.content.chars().count() <= max {
            return self.content.clone();
        }
        let mut cut: String = self.content.chars().take(max).collect();
        cut.push_str("...");
        cut
    }
}

impl Identified for Response {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(EntityKind::Response, self.id.as_str())
    }
}

identity_equality!(Response);

/// Input for posting a response; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewResponse {
    /// Ticket being answered.
    pub ticket_id: TicketId,
    /// Writing account.
    pub author: AccountId,
    /// Message text.
    pub content: String,
    /// Posting time.
    pub created_at: DateTime<Utc>,
}

impl NewResponse {
    /// Attach an issued id.
    #[must_use]
    pub fn into_response(self, id: ResponseId) -> Response {
        Response {
            id,
            ticket_id: self.ticket_id,
            author: self.author,
            content: self.content,
            created_at: self.created_at,
        }
    }
}
