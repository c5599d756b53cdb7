//! Command-line probe over `staffroll_core`.
//!
//! # Responsibility
//! - Validate single identifiers the same way record forms do.
//! - Create or upgrade a database file.
//!
//! # Invariants
//! - Exit code 0 means valid/ok, 1 invalid input, 2 runtime failure.
//! - Output is one deterministic line per command.

use clap::{Parser, Subcommand};
use log::{info, warn};
use staffroll_core::{
    core_version, init_logging, open_db, open_db_in_memory, validate_email,
    validate_identity_number, validate_phone, CoreConfig, ValidationResult,
};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_INVALID: u8 = 1;
const EXIT_RUNTIME: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "staffroll",
    about = "Validate staff identifiers and manage the staff record database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a national identity number (`12345678-5`)
    CheckId { value: String },
    /// Check a mobile phone number (`912345678`)
    CheckPhone { value: String },
    /// Check an e-mail address
    CheckEmail { value: String },
    /// Print the core library version
    Version,
    /// Create or migrate a database file
    InitDb {
        /// Database file; falls back to STAFFROLL_DB_PATH, then in-memory
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_RUNTIME);
        }
    };
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    match cli.command {
        Command::CheckId { value } => report("identity number", validate_identity_number(&value)),
        Command::CheckPhone { value } => report("phone", validate_phone(&value)),
        Command::CheckEmail { value } => report("email", validate_email(&value)),
        Command::Version => {
            println!("staffroll_core version={}", core_version());
            ExitCode::SUCCESS
        }
        Command::InitDb { path } => init_db(path.or(config.database_path)),
    }
}

fn report(kind: &str, result: ValidationResult) -> ExitCode {
    match result {
        ValidationResult::Valid => {
            println!("{kind}: valid");
            ExitCode::SUCCESS
        }
        ValidationResult::InvalidFormat => {
            println!("{kind}: invalid format");
            ExitCode::from(EXIT_INVALID)
        }
        ValidationResult::InvalidChecksum => {
            println!("{kind}: invalid check digit");
            ExitCode::from(EXIT_INVALID)
        }
    }
}

fn init_db(path: Option<PathBuf>) -> ExitCode {
    let opened = match &path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let target = path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());

    match opened {
        Ok(_) => {
            info!("event=cli_init_db module=cli status=ok");
            println!("database ready: {target}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            warn!("event=cli_init_db module=cli status=error");
            eprintln!("error: {target}: {err}");
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}
