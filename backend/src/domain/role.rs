//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role carried by every account.
///
/// Stored and displayed upper-case. Text input is trimmed and compared
/// case-insensitively, so `" tech "` parses as [`Role::Tech`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Opens tickets and follows their progress.
    Client,
    /// Responds to and resolves assigned tickets.
    Tech,
    /// Assigns tickets and manages accounts.
    Admin,
}

impl Role {
    /// Upper-case label matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Tech => "TECH",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when role text names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'; expected CLIENT, TECH or ADMIN")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Ok(Self::Client),
            "TECH" => Ok(Self::Tech),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(RoleParseError(raw.trim().to_owned())),
        }
    }
}
