//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities for accounts, tickets and
//! responses, the ports persistence adapters implement, and the services
//! that enforce the ticket lifecycle rules on top of those ports.
//!
//! Public surface:
//! - `DomainError` / `ErrorCode`: failure payload every service returns.
//! - `User`, `Technician`, `Account`: account model.
//! - `Ticket`, `Response`: ticket model.
//! - `AccountDirectory`, `TicketLifecycle`, `ResponseService`: use-cases.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod identity;
pub mod ports;
pub mod response;
pub mod response_service;
pub mod role;
pub mod ticket;
pub mod ticket_lifecycle;
pub mod transition;
pub mod user;

pub use self::account_service::{AccountDirectory, AccountUpdate, AdminBootstrap, Registration};
pub use self::auth::{LoginCredentials, LoginValidationError, is_well_formed_email};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::identity::{AccountId, EntityKind, IdentityKey, Identified, ResponseId, TicketId};
pub use self::response::{NewResponse, PREVIEW_CHARS, Response};
pub use self::response_service::ResponseService;
pub use self::role::{Role, RoleParseError};
pub use self::ticket::{NewTicket, Priority, Ticket, TicketFilter, TicketState};
pub use self::ticket_lifecycle::{TicketDraft, TicketLifecycle};
pub use self::transition::{TransitionIntent, TransitionKind};
pub use self::user::{Account, NewTechnician, NewUser, Technician, TechnicianProfile, User};

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use ticketdesk::domain::{DomainError, DomainResult};
///
/// fn guarded() -> DomainResult<()> {
///     Err(DomainError::forbidden("nope"))
/// }
/// assert!(guarded().is_err());
/// ```
pub type DomainResult<T> = Result<T, DomainError>;
