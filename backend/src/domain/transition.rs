//! Write-ahead record of a two-record ticket transition.
//!
//! Assigning and resolving rewrite a ticket and a technician in two separate
//! files. Before the first write the lifecycle service stores the post-images
//! of both records as a [`TransitionIntent`]; after the second write succeeds
//! it clears the intent. An intent still present at startup means the process
//! stopped between the writes, and replaying it finishes the transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Technician, Ticket};

/// Which lifecycle step an intent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransitionKind {
    /// Ticket handed to a technician.
    Assign,
    /// Ticket closed by its assignee.
    Resolve,
}

/// Post-images of both records touched by one transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionIntent {
    /// Lifecycle step.
    pub kind: TransitionKind,
    /// Ticket as it must be stored once the transition completes.
    pub ticket: Ticket,
    /// Technician as it must be stored once the transition completes.
    pub technician: Technician,
    /// When the intent was written.
    pub recorded_at: DateTime<Utc>,
}
