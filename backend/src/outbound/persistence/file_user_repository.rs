//! File-backed [`UserRepository`].

use std::sync::Arc;

use record_store::{Collection, EntityStore, Record, StoreError};

use super::USERS_FILE;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{AccountId, NewUser, Role, User};

impl Record for User {
    fn record_id(&self) -> &str {
        self.id().as_str()
    }
}

fn map_store_error(error: StoreError) -> UserPersistenceError {
    UserPersistenceError::write(error.to_string())
}

/// Users stored in `users.json`.
#[derive(Debug, Clone)]
pub struct FileUserRepository {
    users: Collection<User>,
}

impl FileUserRepository {
    /// Bind the repository to `store`.
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            users: Collection::new(store, USERS_FILE),
        }
    }
}

impl UserRepository for FileUserRepository {
    fn find_all(&self) -> Vec<User> {
        self.users.find_all()
    }

    fn find_by_id(&self, id: &AccountId) -> Option<User> {
        self.users.find_by_id(id.as_str())
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .find_all()
            .into_iter()
            .find(|user| user.has_email(email))
    }

    fn find_by_role(&self, role: Role) -> Vec<User> {
        self.users.find_where(|user| user.role() == role)
    }

    fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let prefix = if user.role == Role::Admin { "A" } else { "U" };
        self.users
            .create(prefix, |id| user.into_user(AccountId::new(id)))
            .map_err(map_store_error)
    }

    fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError> {
        self.users.update(user.clone()).map_err(map_store_error)
    }

    fn delete(&self, id: &AccountId) -> Result<bool, UserPersistenceError> {
        self.users.delete(id.as_str()).map_err(map_store_error)
    }
}
