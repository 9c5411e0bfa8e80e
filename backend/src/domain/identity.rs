//! Typed identifiers and the identity key every entity compares by.
//!
//! Identifiers are allocated by the record store as `<prefix><nnn>`, so the
//! newtypes here only wrap the text. They exist to keep a ticket id from being
//! passed where an account id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier issued by the record store.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id! {
    /// Identifier of a user or technician account (`U`, `A` or `T` prefix).
    AccountId
}

define_id! {
    /// Identifier of a ticket (`TK` prefix).
    TicketId
}

define_id! {
    /// Identifier of a response (`R` prefix).
    ResponseId
}

/// Entity family an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Client or administrator account.
    User,
    /// Technician account.
    Technician,
    /// Support ticket.
    Ticket,
    /// Response posted on a ticket.
    Response,
}

/// Identity of an entity: its kind plus its identifier.
///
/// Two values with the same key are the same entity, whatever their other
/// fields hold.
///
/// # Examples
/// ```
/// use ticketdesk::domain::{EntityKind, IdentityKey};
///
/// let user = IdentityKey::new(EntityKind::User, "U001");
/// let ticket = IdentityKey::new(EntityKind::Ticket, "U001");
/// assert_ne!(user, ticket);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    kind: EntityKind,
    id: String,
}

impl IdentityKey {
    /// Build a key from its parts.
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Entity family.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Identifier text.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.id)
    }
}

/// Entities whose equality is decided by their [`IdentityKey`].
pub trait Identified {
    /// Key naming this entity.
    fn identity_key(&self) -> IdentityKey;
}

/// Implement `PartialEq`, `Eq` and `Hash` through [`Identified`].
macro_rules! identity_equality {
    ($name:ty) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::domain::Identified::identity_key(self)
                    == $crate::domain::Identified::identity_key(other)
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&$crate::domain::Identified::identity_key(self), state);
            }
        }
    };
}

pub(crate) use identity_equality;
