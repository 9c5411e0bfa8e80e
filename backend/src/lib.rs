//! Support-ticket tracker over a file-backed record store.
//!
//! Clients open tickets, administrators assign them to technicians and
//! technicians respond to and resolve them. Ticket state and technician
//! workload change together through [`domain::TicketLifecycle`], which
//! journals each two-record transition so an interrupted one is completed
//! by [`bootstrap::bootstrap`] on the next start.

pub mod bootstrap;
pub mod config;
pub mod desk;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use bootstrap::{BootstrapError, BootstrapReport, bootstrap};
pub use config::DeskSettings;
pub use desk::Desk;
