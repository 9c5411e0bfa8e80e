//! Port abstraction for client and administrator accounts.

use crate::domain::{AccountId, NewUser, Role, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The user collection could not be written.
        Write { message: String } => "user repository write failed: {message}",
    }
}

/// Port for reading and writing user accounts.
///
/// Reads never fail: an unreadable collection is reported as empty.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Every user in stored order.
    fn find_all(&self) -> Vec<User>;

    /// The user with `id`, if any.
    fn find_by_id(&self, id: &AccountId) -> Option<User>;

    /// The user whose email matches, ignoring case.
    fn find_by_email(&self, email: &str) -> Option<User>;

    /// Users holding `role`.
    fn find_by_role(&self, role: Role) -> Vec<User>;

    /// Store a new user under a fresh id (`A` prefix for admins, `U` otherwise).
    fn create(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Replace the stored user with the same id. `None` when no user matches.
    fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Remove the user with `id`, reporting whether one was removed.
    fn delete(&self, id: &AccountId) -> Result<bool, UserPersistenceError>;
}
