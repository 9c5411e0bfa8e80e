//! Command-line adapter.
//!
//! Parses arguments with clap, authenticates the acting account from
//! `--as`/`--password`, calls one service operation and prints the result as
//! pretty JSON. Passwords never appear in the output.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use record_store::StoreError;
use serde::Serialize;
use thiserror::Error;

use crate::desk::Desk;
use crate::domain::{
    Account, AccountId, AccountUpdate, DomainError, ErrorCode, PREVIEW_CHARS, Priority,
    Registration, Response, Role, Technician, TicketDraft, TicketFilter, TicketId, TicketState,
    User,
};

/// Support-ticket tracker.
#[derive(Debug, Parser)]
#[command(name = "ticketdesk", version, about)]
pub struct Cli {
    /// Directory holding the collection files.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<String>,
    /// Email of the acting account.
    #[arg(long = "as", global = true, value_name = "EMAIL", requires = "password")]
    pub actor: Option<String>,
    /// Password of the acting account.
    #[arg(long, global = true, requires = "actor")]
    pub password: Option<String>,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a client account.
    Register(RegisterArgs),
    /// Check the `--as`/`--password` credentials and show the account.
    Login,
    /// Technician management.
    #[command(subcommand)]
    Technician(TechnicianCommand),
    /// Ticket operations.
    #[command(subcommand)]
    Ticket(TicketCommand),
    /// Account administration.
    #[command(subcommand)]
    Account(AccountCommand),
}

/// Fields for a new account.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Login password.
    pub secret: String,
}

/// Technician operations.
#[derive(Debug, Subcommand)]
pub enum TechnicianCommand {
    /// Add a technician (administrators only).
    Add {
        /// Account fields.
        #[command(flatten)]
        account: RegisterArgs,
        /// Area of expertise.
        #[arg(long, default_value = "")]
        specialization: String,
    },
    /// List technicians, optionally by specialization.
    List {
        /// Only technicians with this specialization.
        #[arg(long)]
        specialization: Option<String>,
    },
    /// Show the least loaded technician for a specialization.
    LeastLoaded {
        /// Specialization to match, ignoring case.
        specialization: String,
    },
}

/// Ticket operations.
#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// Open a ticket (clients only).
    Create {
        /// Short summary.
        #[arg(long)]
        title: String,
        /// Full problem description.
        #[arg(long)]
        description: String,
        /// Free-text category.
        #[arg(long)]
        category: String,
        /// LOW, MEDIUM or HIGH.
        #[arg(long, default_value = "MEDIUM")]
        priority: Priority,
    },
    /// Assign an open ticket to a technician (administrators only).
    Assign {
        /// Ticket to assign.
        ticket: String,
        /// Technician receiving it.
        technician: String,
    },
    /// Close a ticket assigned to the acting technician.
    Resolve {
        /// Ticket to close.
        ticket: String,
    },
    /// List tickets matching every given filter.
    List {
        /// Category, ignoring case.
        #[arg(long)]
        category: Option<String>,
        /// OPEN, ASSIGNED or CLOSED.
        #[arg(long)]
        state: Option<TicketState>,
        /// LOW, MEDIUM or HIGH.
        #[arg(long)]
        priority: Option<Priority>,
        /// Author id.
        #[arg(long)]
        author: Option<String>,
        /// Assignee id.
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Show one ticket.
    Show {
        /// Ticket id.
        ticket: String,
    },
    /// Post a response on an open ticket.
    Respond {
        /// Ticket id.
        ticket: String,
        /// Response text.
        content: String,
    },
    /// List responses on a ticket, oldest first.
    Responses {
        /// Ticket id.
        ticket: String,
        /// Show shortened content.
        #[arg(long)]
        preview: bool,
    },
}

/// Account administration.
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Change an account's name, email and role (administrators only).
    Update {
        /// Account id.
        id: String,
        /// New display name.
        #[arg(long)]
        name: String,
        /// New email.
        #[arg(long)]
        email: String,
        /// CLIENT, TECH or ADMIN.
        #[arg(long)]
        role: String,
    },
}

/// Errors surfaced by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// A service rejected the request.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The data directory could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// Stable machine-readable code printed with the message.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.code().as_str(),
            Self::Store(_) => ErrorCode::PersistenceFailure.as_str(),
            Self::Encode(_) | Self::Output(_) => "output_failure",
        }
    }
}

/// Password-free projection of an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountView<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    specialization: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workload: Option<u32>,
}

impl<'a> AccountView<'a> {
    fn member(user: &'a User) -> Self {
        Self {
            id: user.id().as_str(),
            name: user.name(),
            email: user.email(),
            role: user.role(),
            specialization: None,
            workload: None,
        }
    }

    fn technician(technician: &'a Technician) -> Self {
        Self {
            specialization: Some(technician.specialization()),
            workload: Some(technician.workload()),
            ..Self::member(technician.user())
        }
    }

    fn account(account: &'a Account) -> Self {
        match account {
            Account::Member(user) => Self::member(user),
            Account::Technician(technician) => Self::technician(technician),
        }
    }
}

/// Response with its content shortened.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePreview<'a> {
    id: &'a str,
    author: &'a str,
    created_at: chrono::DateTime<chrono::Utc>,
    preview: String,
}

impl<'a> From<&'a Response> for ResponsePreview<'a> {
    fn from(response: &'a Response) -> Self {
        Self {
            id: response.id().as_str(),
            author: response.author().as_str(),
            created_at: response.created_at(),
            preview: response.preview(PREVIEW_CHARS),
        }
    }
}

impl Cli {
    fn actor(&self, desk: &Desk) -> Result<Account, DomainError> {
        let (Some(email), Some(password)) = (self.actor.as_deref(), self.password.as_deref())
        else {
            return Err(DomainError::unauthorized(
                "this command requires --as and --password",
            ));
        };
        desk.accounts
            .authenticate(email, password)
            .ok_or_else(|| DomainError::unauthorized("invalid email or password"))
    }
}

fn emit<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Run the parsed command against `desk`, writing JSON to `out`.
///
/// # Errors
///
/// Returns [`CliError::Domain`] when a service rejects the request and an
/// output error when `out` cannot be written.
pub fn run<W: Write>(cli: &Cli, desk: &Desk, out: &mut W) -> Result<(), CliError> {
    match &cli.command {
        Command::Register(args) => {
            let user = desk.accounts.register_client(registration(args))?;
            emit(out, &AccountView::member(&user))
        }
        Command::Login => {
            let account = cli.actor(desk)?;
            emit(out, &AccountView::account(&account))
        }
        Command::Technician(command) => run_technician(cli, command, desk, out),
        Command::Ticket(command) => run_ticket(cli, command, desk, out),
        Command::Account(AccountCommand::Update {
            id,
            name,
            email,
            role,
        }) => {
            let actor = cli.actor(desk)?;
            let updated = desk.accounts.update_account(
                &actor,
                &AccountId::new(id.as_str()),
                AccountUpdate {
                    name: name.clone(),
                    email: email.clone(),
                    role: role.clone(),
                },
            )?;
            emit(out, &AccountView::account(&updated))
        }
    }
}

fn registration(args: &RegisterArgs) -> Registration {
    Registration::new(args.name.as_str(), args.email.as_str(), args.secret.as_str())
}

fn run_technician<W: Write>(
    cli: &Cli,
    command: &TechnicianCommand,
    desk: &Desk,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        TechnicianCommand::Add {
            account,
            specialization,
        } => {
            let actor = cli.actor(desk)?;
            let technician =
                desk.accounts
                    .add_technician(&actor, registration(account), specialization)?;
            emit(out, &AccountView::technician(&technician))
        }
        TechnicianCommand::List { specialization } => {
            let technicians = specialization.as_deref().map_or_else(
                || desk.accounts.technicians(),
                |wanted| desk.accounts.technicians_by_specialization(wanted),
            );
            let views: Vec<_> = technicians.iter().map(AccountView::technician).collect();
            emit(out, &views)
        }
        TechnicianCommand::LeastLoaded { specialization } => {
            let technician = desk
                .accounts
                .least_loaded_technician(specialization)
                .ok_or_else(|| {
                    DomainError::not_found(format!(
                        "no technician specialized in '{}'",
                        specialization.trim()
                    ))
                })?;
            emit(out, &AccountView::technician(&technician))
        }
    }
}

fn run_ticket<W: Write>(
    cli: &Cli,
    command: &TicketCommand,
    desk: &Desk,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        TicketCommand::Create {
            title,
            description,
            category,
            priority,
        } => {
            let actor = cli.actor(desk)?;
            let ticket = desk.tickets.create(
                &actor,
                TicketDraft {
                    title: title.clone(),
                    description: description.clone(),
                    category: category.clone(),
                    priority: *priority,
                },
            )?;
            emit(out, &ticket)
        }
        TicketCommand::Assign { ticket, technician } => {
            let actor = cli.actor(desk)?;
            let assigned = desk.tickets.assign(
                &actor,
                &TicketId::new(ticket.as_str()),
                &AccountId::new(technician.as_str()),
            )?;
            emit(out, &assigned)
        }
        TicketCommand::Resolve { ticket } => {
            let actor = cli.actor(desk)?;
            let resolved = desk
                .tickets
                .resolve(&actor, &TicketId::new(ticket.as_str()))?;
            emit(out, &resolved)
        }
        TicketCommand::List {
            category,
            state,
            priority,
            author,
            assignee,
        } => {
            let filter = TicketFilter {
                category: category.clone(),
                state: *state,
                priority: *priority,
                author: author.as_deref().map(AccountId::new),
                assignee: assignee.as_deref().map(AccountId::new),
            };
            emit(out, &desk.tickets.list(&filter))
        }
        TicketCommand::Show { ticket } => {
            let id = TicketId::new(ticket.as_str());
            let found = desk
                .tickets
                .find(&id)
                .ok_or_else(|| DomainError::not_found(format!("no ticket with id {id}")))?;
            emit(out, &found)
        }
        TicketCommand::Respond { ticket, content } => {
            let actor = cli.actor(desk)?;
            let response =
                desk.responses
                    .add_response(&actor, &TicketId::new(ticket.as_str()), content)?;
            emit(out, &response)
        }
        TicketCommand::Responses { ticket, preview } => {
            let responses = desk
                .responses
                .responses_for_ticket(&TicketId::new(ticket.as_str()));
            if *preview {
                let previews: Vec<_> = responses.iter().map(ResponsePreview::from).collect();
                emit(out, &previews)
            } else {
                emit(out, &responses)
            }
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
