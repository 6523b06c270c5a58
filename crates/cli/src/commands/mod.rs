//! Command implementations.
//!
//! Every command opens the data directory through [`open_state`] and, except
//! `init`, authenticates the acting user first.

pub mod catalog;
pub mod init;
pub mod reports;
pub mod sales;
pub mod users;

use std::io::Write;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use storekeeper_backoffice::config::{BackofficeConfig, ConfigError};
use storekeeper_backoffice::models::User;
use storekeeper_backoffice::{AppError, AppState};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The back office rejected the operation.
    #[error(transparent)]
    App(#[from] AppError),

    /// No acting user was given.
    #[error("Missing credentials: pass --user and --password (or set STORE_USER / STORE_PASSWORD)")]
    MissingCredentials,

    /// A command-line value could not be interpreted.
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// Writing to stdout failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Load configuration and open the stores.
///
/// # Errors
///
/// Returns `CliError::Config` or `CliError::App` if either step fails.
pub fn open_state(data_dir: Option<PathBuf>) -> Result<AppState, CliError> {
    let mut config = BackofficeConfig::from_env()?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }

    tracing::debug!(?config, "Configuration loaded");
    Ok(AppState::open(config)?)
}

/// Acting user as given on the command line.
pub struct Credentials {
    username: Option<String>,
    password: Option<SecretString>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password: password.map(SecretString::from),
        }
    }

    /// Log in as the acting user.
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingCredentials` if either part is absent, or
    /// the login failure from the back office.
    pub fn login(&self, state: &mut AppState) -> Result<User, CliError> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Err(CliError::MissingCredentials);
        };
        Ok(state.users().login(username, password)?)
    }
}

/// Fail unless `actor` is an administrator.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` wrapped in `CliError::App`.
pub fn require_admin(actor: &User, action: &str) -> Result<(), CliError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!("Only administrators can {action}")).into())
    }
}

/// Write a block of text to stdout.
///
/// # Errors
///
/// Returns `CliError::Output` if stdout is closed.
pub fn emit(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Write one table row per item to stdout.
///
/// # Errors
///
/// Returns `CliError::Output` if stdout is closed.
pub fn emit_rows<I>(header: &str, rows: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{header}")?;
    let mut count = 0usize;
    for row in rows {
        writeln!(stdout, "{row}")?;
        count += 1;
    }
    if count == 0 {
        writeln!(stdout, "(none)")?;
    }
    stdout.flush()?;
    Ok(())
}
