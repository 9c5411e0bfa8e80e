//! Account directory: registration, login and administrator account edits.
//!
//! Users and technicians live in separate collections but share one email
//! namespace, so every write here checks both.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{
    TechnicianPersistenceError, TechnicianRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Account, AccountId, DomainError, DomainResult, IdentityKey, LoginCredentials, NewTechnician,
    NewUser, Role, Technician, TechnicianProfile, User, is_well_formed_email,
};

fn map_user_error(operation: &str, error: UserPersistenceError) -> DomainError {
    DomainError::persistence(format!("persistence failure while {operation}: {error}"))
}

fn map_technician_error(operation: &str, error: TechnicianPersistenceError) -> DomainError {
    DomainError::persistence(format!("persistence failure while {operation}: {error}"))
}

/// Name, email and password supplied when opening an account.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl Registration {
    /// Bundle the three registration fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// New values for an existing account, applied by an administrator.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role as text; trimmed and compared case-insensitively.
    pub role: String,
}

/// Outcome of making sure the well-known administrator exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminBootstrap {
    /// The administrator was missing and has been created.
    Created(User),
    /// An account with the administrator email already exists.
    AlreadyPresent(AccountId),
}

/// Directory over both account collections.
pub struct AccountDirectory<U, T> {
    users: Arc<U>,
    technicians: Arc<T>,
}

impl<U, T> Clone for AccountDirectory<U, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            technicians: Arc::clone(&self.technicians),
        }
    }
}

impl<U, T> AccountDirectory<U, T>
where
    U: UserRepository,
    T: TechnicianRepository,
{
    /// Create a directory over the user and technician repositories.
    pub const fn new(users: Arc<U>, technicians: Arc<T>) -> Self {
        Self { users, technicians }
    }

    /// Check raw credentials. `None` for blank or malformed input, unknown
    /// email, or a wrong password.
    #[must_use]
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Account> {
        let credentials = LoginCredentials::try_from_parts(email, password).ok()?;
        self.login(&credentials)
    }

    /// Check validated credentials. Users are searched before technicians.
    #[must_use]
    pub fn login(&self, credentials: &LoginCredentials) -> Option<Account> {
        let account = self.find_by_email(credentials.email())?;
        if account.user().password_matches(credentials.password()) {
            info!(account = %account.id(), role = %account.role(), "login accepted");
            Some(account)
        } else {
            info!(email = credentials.email(), "login rejected");
            None
        }
    }

    /// Account with `email` in either collection, users first.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.users
            .find_by_email(email)
            .map(Account::Member)
            .or_else(|| {
                self.technicians
                    .find_by_email(email)
                    .map(Account::Technician)
            })
    }

    /// Account with `id` in either collection.
    #[must_use]
    pub fn find_account(&self, id: &AccountId) -> Option<Account> {
        self.users
            .find_by_id(id)
            .map(Account::Member)
            .or_else(|| self.technicians.find_by_id(id).map(Account::Technician))
    }

    /// Open a client account.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for blank fields or a malformed email, `Conflict` when
    /// the email is taken, `PersistenceFailure` when the write fails.
    pub fn register_client(&self, registration: Registration) -> DomainResult<User> {
        self.register_member(registration, Role::Client)
    }

    /// Open an administrator account.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register_client`].
    pub fn register_admin(&self, registration: Registration) -> DomainResult<User> {
        self.register_member(registration, Role::Admin)
    }

    /// Open a technician account with no assigned work.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register_client`].
    pub fn register_technician(
        &self,
        registration: Registration,
        specialization: &str,
    ) -> DomainResult<Technician> {
        validate_registration(&registration)?;
        self.ensure_email_free(&registration.email, None)?;
        let technician = self
            .technicians
            .create(NewTechnician {
                name: registration.name.trim().to_owned(),
                email: registration.email,
                password: registration.password,
                profile: TechnicianProfile::new(specialization.trim()),
            })
            .map_err(|err| map_technician_error("registering the technician", err))?;
        info!(account = %technician.id(), "technician registered");
        Ok(technician)
    }

    /// Open a technician account on behalf of an administrator.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless `actor` is an administrator, otherwise as
    /// [`Self::register_technician`].
    pub fn add_technician(
        &self,
        actor: &Account,
        registration: Registration,
        specialization: &str,
    ) -> DomainResult<Technician> {
        if actor.role() != Role::Admin {
            return Err(DomainError::forbidden(
                "only administrators can add technicians",
            ));
        }
        self.register_technician(registration, specialization)
    }

    /// Make sure an account with the administrator email exists.
    ///
    /// # Errors
    ///
    /// Validation or persistence failures from [`Self::register_admin`]. An
    /// existing account is not an error.
    pub fn ensure_admin(&self, registration: Registration) -> DomainResult<AdminBootstrap> {
        if let Some(existing) = self.find_by_email(&registration.email) {
            if existing.role() != Role::Admin {
                warn!(
                    account = %existing.id(),
                    role = %existing.role(),
                    "administrator email is held by a non-admin account"
                );
            }
            info!(account = %existing.id(), "administrator already present");
            return Ok(AdminBootstrap::AlreadyPresent(existing.id().clone()));
        }
        let admin = self.register_admin(registration)?;
        info!(account = %admin.id(), "administrator created");
        Ok(AdminBootstrap::Created(admin))
    }

    /// Every technician in stored order.
    #[must_use]
    pub fn technicians(&self) -> Vec<Technician> {
        self.technicians.find_all()
    }

    /// Technicians whose specialization matches, ignoring case.
    #[must_use]
    pub fn technicians_by_specialization(&self, specialization: &str) -> Vec<Technician> {
        self.technicians.find_by_specialization(specialization)
    }

    /// Least loaded technician for `specialization`.
    #[must_use]
    pub fn least_loaded_technician(&self, specialization: &str) -> Option<Technician> {
        self.technicians
            .find_least_loaded_by_specialization(specialization)
    }

    /// Users holding `role`.
    #[must_use]
    pub fn users_with_role(&self, role: Role) -> Vec<User> {
        self.users.find_by_role(role)
    }

    /// Apply `update` to the account `id` on behalf of `actor`.
    ///
    /// Changing a user to TECH moves it into the technician collection with an
    /// empty profile and a fresh `T` id. Technicians never leave their
    /// collection, since tickets keep naming them as assignee.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless `actor` is an administrator, `NotFound` for an
    /// unknown id, `InvalidRequest` for blank or malformed values, `Conflict`
    /// when the email is taken or a technician is given a non-TECH role,
    /// `PersistenceFailure` when a write fails.
    pub fn update_account(
        &self,
        actor: &Account,
        id: &AccountId,
        update: AccountUpdate,
    ) -> DomainResult<Account> {
        if actor.role() != Role::Admin {
            return Err(DomainError::forbidden(
                "only administrators can update accounts",
            ));
        }
        let current = self
            .find_account(id)
            .ok_or_else(|| DomainError::not_found(format!("no account with id {id}")))?;

        let name = update.name.trim();
        let email = update.email.as_str();
        if name.is_empty() {
            return Err(DomainError::invalid_request("name must not be empty"));
        }
        if !is_well_formed_email(email) {
            return Err(DomainError::invalid_request(format!(
                "'{email}' is not a valid email address"
            )));
        }
        let role = update
            .role
            .parse::<Role>()
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        if !current.user().has_email(email) {
            self.ensure_email_free(email, Some(&current.identity_key()))?;
        }

        let updated = match (current, role) {
            (Account::Member(user), Role::Tech) => self.promote(&user, name, email)?,
            (Account::Member(user), member_role) => {
                self.rewrite_member(&user, name, email, member_role)?
            }
            (Account::Technician(technician), Role::Tech) => {
                self.rewrite_technician(&technician, name, email)?
            }
            (Account::Technician(technician), member_role) => {
                return Err(DomainError::conflict(format!(
                    "technician {} cannot take the {member_role} role",
                    technician.id()
                )));
            }
        };
        info!(
            actor = %actor.id(),
            previous = %id,
            account = %updated.id(),
            role = %updated.role(),
            "account updated"
        );
        Ok(updated)
    }

    fn register_member(&self, registration: Registration, role: Role) -> DomainResult<User> {
        validate_registration(&registration)?;
        self.ensure_email_free(&registration.email, None)?;
        let user = self
            .users
            .create(NewUser {
                name: registration.name.trim().to_owned(),
                email: registration.email,
                password: registration.password,
                role,
            })
            .map_err(|err| map_user_error("registering the account", err))?;
        info!(account = %user.id(), role = %role, "account registered");
        Ok(user)
    }

    fn ensure_email_free(&self, email: &str, except: Option<&IdentityKey>) -> DomainResult<()> {
        match self.find_by_email(email) {
            Some(holder) if Some(&holder.identity_key()) != except => Err(DomainError::conflict(
                format!("email '{email}' is already registered"),
            )),
            _ => Ok(()),
        }
    }

    fn rewrite_member(
        &self,
        user: &User,
        name: &str,
        email: &str,
        role: Role,
    ) -> DomainResult<Account> {
        let updated = user.with_details(name, email, role);
        self.users
            .update(&updated)
            .map_err(|err| map_user_error("updating the account", err))?
            .map(Account::Member)
            .ok_or_else(|| DomainError::not_found(format!("no account with id {}", user.id())))
    }

    fn rewrite_technician(
        &self,
        technician: &Technician,
        name: &str,
        email: &str,
    ) -> DomainResult<Account> {
        let updated = technician.with_details(name, email);
        self.technicians
            .update(&updated)
            .map_err(|err| map_technician_error("updating the technician", err))?
            .map(Account::Technician)
            .ok_or_else(|| {
                DomainError::not_found(format!("no account with id {}", technician.id()))
            })
    }

    fn promote(&self, user: &User, name: &str, email: &str) -> DomainResult<Account> {
        let technician = self
            .technicians
            .create(NewTechnician {
                name: name.to_owned(),
                email: email.to_owned(),
                password: user.password().to_owned(),
                profile: TechnicianProfile::default(),
            })
            .map_err(|err| map_technician_error("moving the account to technicians", err))?;
        self.users
            .delete(user.id())
            .map_err(|err| map_user_error("removing the moved account", err))?;
        Ok(Account::Technician(technician))
    }
}

fn validate_registration(registration: &Registration) -> DomainResult<()> {
    if registration.name.trim().is_empty() {
        return Err(DomainError::invalid_request("name must not be empty"));
    }
    if registration.password.trim().is_empty() {
        return Err(DomainError::invalid_request("password must not be empty"));
    }
    if !is_well_formed_email(&registration.email) {
        return Err(DomainError::invalid_request(format!(
            "'{}' is not a valid email address",
            registration.email
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
