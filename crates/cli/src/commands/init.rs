//! Bootstrap the first administrator.
//!
//! # Usage
//!
//! ```bash
//! STORE_ADMIN_PASSWORD='...' sk-cli init
//! sk-cli init --admin-password '...'
//! ```

use secrecy::SecretString;

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::config::validate_password_strength;

use super::{CliError, emit};

/// Create the `admin` account unless an administrator already exists.
///
/// # Errors
///
/// Returns `CliError::Config` when no password is available or it is too
/// weak, or the back-office error if the account cannot be written.
pub fn bootstrap_admin(state: &mut AppState, admin_password: Option<String>) -> Result<(), CliError> {
    let password = match admin_password {
        Some(value) => {
            validate_password_strength(&value, "--admin-password")?;
            SecretString::from(value)
        }
        None => state.config().require_admin_password()?.clone(),
    };

    match state.users().initialize_admin(&password)? {
        Some(admin) => emit(&format!(
            "Created admin account '{}' ({})",
            admin.username, admin.id
        )),
        None => emit("An admin account already exists; nothing to do"),
    }
}
