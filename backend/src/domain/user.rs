//! Account data model: members, technicians and the variant joining them.
//!
//! A technician is a [`User`] composed with a [`TechnicianProfile`]; the two
//! live in separate collections and [`Account`] tags which one a lookup found.
//! Both serialize flat, so a technician record reads like a user record with
//! `specialization` and `workload` appended.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identity::identity_equality;
use super::{AccountId, EntityKind, IdentityKey, Identified, Role};

/// Client or administrator account, also the base of every technician.
///
/// ## Invariants
/// - `email` is unique across users and technicians, compared
///   case-insensitively. The account directory enforces this on write.
/// - `password` is compared exactly and never shown by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: AccountId,
    name: String,
    email: String,
    password: String,
    role: Role,
}

impl User {
    /// Assemble a user from stored parts.
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login email as stored.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether `email` names this account, ignoring case.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Whether `candidate` is exactly the stored password.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Copy of this user with new profile fields and the same id and password.
    #[must_use]
    pub fn with_details(&self, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: self.id.clone(),
            name: name.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            role,
        }
    }

    /// Plaintext password, used when moving an account between collections.
    pub(crate) fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

impl Identified for User {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(EntityKind::User, self.id.as_str())
    }
}

identity_equality!(User);

/// Technician-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianProfile {
    #[serde(default)]
    specialization: String,
    #[serde(default)]
    workload: u32,
}

impl TechnicianProfile {
    /// Profile with `specialization` and no open work.
    pub fn new(specialization: impl Into<String>) -> Self {
        Self {
            specialization: specialization.into(),
            workload: 0,
        }
    }

    /// Free-text area of expertise, possibly empty.
    #[must_use]
    pub fn specialization(&self) -> &str {
        self.specialization.as_str()
    }

    /// Number of non-closed tickets assigned to the technician.
    #[must_use]
    pub const fn workload(&self) -> u32 {
        self.workload
    }
}

/// A user with role TECH plus a technician profile.
///
/// # Examples
/// ```
/// use ticketdesk::domain::{AccountId, Role, Technician, TechnicianProfile};
///
/// let mut tech = Technician::new(
///     AccountId::new("T001"),
///     "Ana",
///     "ana@desk.io",
///     "pw",
///     TechnicianProfile::new("Network"),
/// );
/// tech.decrement_workload();
/// assert_eq!(tech.workload(), 0);
/// assert_eq!(tech.user().role(), Role::Tech);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    #[serde(flatten)]
    user: User,
    #[serde(flatten)]
    profile: TechnicianProfile,
}

impl Technician {
    /// Assemble a technician; the role is always [`Role::Tech`].
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        profile: TechnicianProfile,
    ) -> Self {
        Self {
            user: User::new(id, name, email, password, Role::Tech),
            profile,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        self.user.id()
    }

    /// Account part.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Technician-only part.
    #[must_use]
    pub const fn profile(&self) -> &TechnicianProfile {
        &self.profile
    }

    /// Area of expertise.
    #[must_use]
    pub fn specialization(&self) -> &str {
        self.profile.specialization()
    }

    /// Number of non-closed tickets assigned.
    #[must_use]
    pub const fn workload(&self) -> u32 {
        self.profile.workload
    }

    /// Record one more assigned ticket.
    pub const fn increment_workload(&mut self) {
        self.profile.workload = self.profile.workload.saturating_add(1);
    }

    /// Record one fewer assigned ticket, never dropping below zero.
    pub const fn decrement_workload(&mut self) {
        self.profile.workload = self.profile.workload.saturating_sub(1);
    }

    /// Copy with new name and email, keeping id, password and profile.
    #[must_use]
    pub fn with_details(&self, name: &str, email: &str) -> Self {
        Self {
            user: self.user.with_details(name, email, Role::Tech),
            profile: self.profile.clone(),
        }
    }
}

impl Identified for Technician {
    fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(EntityKind::Technician, self.id().as_str())
    }
}

identity_equality!(Technician);

/// Input for creating a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Role; [`Role::Admin`] selects the `A` id prefix.
    pub role: Role,
}

impl NewUser {
    /// Attach an issued id.
    #[must_use]
    pub fn into_user(self, id: AccountId) -> User {
        User::new(id, self.name, self.email, self.password, self.role)
    }
}

/// Input for creating a technician; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTechnician {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Starting profile, normally empty workload.
    pub profile: TechnicianProfile,
}

impl NewTechnician {
    /// Attach an issued id.
    #[must_use]
    pub fn into_technician(self, id: AccountId) -> Technician {
        Technician::new(id, self.name, self.email, self.password, self.profile)
    }
}

/// Result of a directory lookup: which collection the account lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Account {
    /// Client or administrator.
    Member(User),
    /// Technician.
    Technician(Technician),
}

impl Account {
    /// Account part shared by both variants.
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Member(user) => user,
            Self::Technician(technician) => technician.user(),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        self.user().id()
    }

    /// Account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.user().role()
    }

    /// Identity of the underlying record.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        match self {
            Self::Member(user) => user.identity_key(),
            Self::Technician(technician) => technician.identity_key(),
        }
    }
}
