//! Startup steps run before any command.

use thiserror::Error;
use tracing::info;

use crate::config::DeskSettings;
use crate::desk::Desk;
use crate::domain::{AdminBootstrap, DomainError, Registration, TransitionIntent};

/// Errors returned while bootstrapping the data directory.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A pending transition could not be rolled forward.
    #[error("failed to replay pending transition: {0}")]
    Replay(#[source] DomainError),
    /// The default administrator could not be created.
    #[error("failed to ensure default administrator: {0}")]
    Admin(#[source] DomainError),
}

/// What bootstrap found and did.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Transition rolled forward, if one was pending.
    pub replayed: Option<TransitionIntent>,
    /// Whether the administrator was created or already present.
    pub admin: AdminBootstrap,
}

/// Finish any interrupted transition, then make sure the configured
/// administrator exists. Safe to run on every start.
///
/// # Errors
///
/// [`BootstrapError::Replay`] when the journal cannot be replayed and
/// [`BootstrapError::Admin`] when the administrator cannot be stored.
pub fn bootstrap(settings: &DeskSettings, desk: &Desk) -> Result<BootstrapReport, BootstrapError> {
    let replayed = desk
        .tickets
        .replay_pending()
        .map_err(BootstrapError::Replay)?;
    if let Some(intent) = &replayed {
        info!(
            ticket = %intent.ticket.id(),
            technician = %intent.technician.id(),
            "pending transition completed"
        );
    }

    let admin = desk
        .accounts
        .ensure_admin(Registration::new(
            settings.admin_name(),
            settings.admin_email(),
            settings.admin_password(),
        ))
        .map_err(BootstrapError::Admin)?;

    Ok(BootstrapReport { replayed, admin })
}
