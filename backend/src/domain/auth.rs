//! Authentication primitives: login credentials and the email shape check.
//!
//! Inbound adapters build [`LoginCredentials`] before talking to the account
//! directory, so malformed input never reaches a lookup.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `email` has the shape `local@domain.tld`.
///
/// # Examples
/// ```
/// use ticketdesk::domain::is_well_formed_email;
///
/// assert!(is_well_formed_email("ana@desk.io"));
/// assert!(!is_well_formed_email("ana@desk"));
/// ```
#[must_use]
pub fn is_well_formed_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Domain error returned when login values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or whitespace only.
    EmptyEmail,
    /// Email does not look like an address.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email is not a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account directory.
///
/// ## Invariants
/// - `email` is non-empty and well formed exactly as given; surrounding
///   whitespace makes it malformed.
/// - `password` is non-blank but keeps caller-provided whitespace so the
///   exact-match comparison sees what the caller typed. It is wiped from
///   memory on drop.
///
/// # Examples
/// ```
/// use ticketdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ana@Desk.io", "pw").unwrap();
/// assert_eq!(creds.email(), "Ana@Desk.io");
/// assert_eq!(creds.password(), "pw");
/// assert!(LoginCredentials::try_from_parts(" ana@desk.io ", "pw").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// # Errors
    ///
    /// Returns a [`LoginValidationError`] naming the first rule broken.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.trim().is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if !is_well_formed_email(email) {
            return Err(LoginValidationError::MalformedEmail);
        }

        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email suitable for account lookups.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
