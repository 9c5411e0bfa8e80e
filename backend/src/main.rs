//! Command-line entry point: loads settings, bootstraps the data directory
//! and runs one command.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ticketdesk::inbound::cli::{self, Cli, CliError};
use ticketdesk::{Desk, DeskSettings, bootstrap};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Cli::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(code = failure.code, error = %failure.message, "command failed");
            if let Err(write_err) = writeln!(
                io::stderr().lock(),
                "error [{}]: {}",
                failure.code,
                failure.message
            ) {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

struct Failure {
    code: &'static str,
    message: String,
}

impl From<CliError> for Failure {
    fn from(err: CliError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

fn execute(args: &Cli) -> Result<(), Failure> {
    let settings = DeskSettings::load_from_iter([OsString::from("ticketdesk")])
        .map_err(|err| Failure {
            code: "invalid_configuration",
            message: err.to_string(),
        })?
        .with_data_dir(args.data_dir.clone());

    let desk = Desk::open(&settings.data_dir(), Arc::new(DefaultClock))
        .map_err(|err| Failure::from(CliError::from(err)))?;
    bootstrap(&settings, &desk).map_err(|err| Failure {
        code: "bootstrap_failure",
        message: err.to_string(),
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::run(args, &desk, &mut out)?;
    Ok(())
}
